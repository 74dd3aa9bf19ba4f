//! Field validation for oracle-produced values.
//!
//! A [`ValidationError`] means the oracle replied with well-formed JSON whose
//! *content* is wrong (a level of 7, a category that is a number, ...). It is
//! a content problem rather than a transient fault, so callers must not
//! retry it.
//!
//! # Group analysis schema
//!
//! ```json
//! {
//!   "category": "non-empty string, at most 255 characters",
//!   "expertise_level": "integer 1-5 (alias: expertise_rating)",
//!   "knowledge_gaps": ["string", "..."],
//!   "recommendations": ["string", "..."]
//! }
//! ```
//!
//! Missing or `null` lists are read as empty lists; present lists must hold
//! only strings.

use super::entities::{ExpertiseLevel, GroupAnalysis, ResourceRecommendation};
use serde_json::{Map, Value};
use thiserror::Error;

/// Longest category accepted, in characters (the record store's column size).
pub const CATEGORY_MAX_CHARS: usize = 255;

/// Keys accepted for the expertise level, in lookup order.
const EXPERTISE_KEYS: [&str; 2] = ["expertise_level", "expertise_rating"];

/// A parsed value violates a field domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("field `category` must not be empty")]
    EmptyCategory,

    #[error("field `category` has {len} characters, at most {max} allowed")]
    CategoryTooLong { len: usize, max: usize },

    #[error("expertise level {0} is outside the range 1-5")]
    ExpertiseOutOfRange(String),

    #[error("resource {index} has an empty title")]
    EmptyResourceTitle { index: usize },
}

/// Validate a parsed group analysis.
pub fn validate_group_analysis(value: &Value) -> Result<GroupAnalysis, ValidationError> {
    let object = as_object(value)?;

    let category = validate_category(object.get("category"))?;
    let expertise_level = validate_expertise(object)?;
    let knowledge_gaps = string_list(object, "knowledge_gaps")?;
    let recommendations = string_list(object, "recommendations")?;

    Ok(GroupAnalysis::new(
        category,
        expertise_level,
        knowledge_gaps,
        recommendations,
    ))
}

/// Validate a parsed list of learning resources.
///
/// Accepts `{"resources": [...]}` or a bare top-level array. Each entry is
/// either an object with a non-empty `title` and an optional `url`, or a
/// plain string taken as the title.
pub fn validate_resources(value: &Value) -> Result<Vec<ResourceRecommendation>, ValidationError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("resources") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(wrong_type("resources", "an array", other));
            }
            None => return Err(ValidationError::MissingField("resources")),
        },
        other => return Err(ValidationError::NotAnObject(kind(other))),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| resource(index, item))
        .collect()
}

fn resource(index: usize, item: &Value) -> Result<ResourceRecommendation, ValidationError> {
    let (title, url) = match item {
        Value::String(title) => (title.as_str(), None),
        Value::Object(map) => {
            let title = match map.get("title") {
                Some(Value::String(title)) => title.as_str(),
                Some(other) => {
                    return Err(wrong_type(
                        &format!("resources[{}].title", index),
                        "a string",
                        other,
                    ));
                }
                None => return Err(ValidationError::EmptyResourceTitle { index }),
            };
            let url = match map.get("url") {
                None | Some(Value::Null) => None,
                Some(Value::String(url)) if url.trim().is_empty() => None,
                Some(Value::String(url)) => Some(url.trim().to_string()),
                Some(other) => {
                    return Err(wrong_type(
                        &format!("resources[{}].url", index),
                        "a string",
                        other,
                    ));
                }
            };
            (title, url)
        }
        other => {
            return Err(wrong_type(
                &format!("resources[{}]", index),
                "an object or string",
                other,
            ));
        }
    };

    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyResourceTitle { index });
    }

    Ok(ResourceRecommendation {
        title: title.to_string(),
        url,
    })
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject(kind(value)))
}

fn validate_category(value: Option<&Value>) -> Result<String, ValidationError> {
    let category = match value {
        Some(Value::String(s)) => s.trim(),
        Some(Value::Null) | None => return Err(ValidationError::MissingField("category")),
        Some(other) => return Err(wrong_type("category", "a string", other)),
    };

    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    let len = category.chars().count();
    if len > CATEGORY_MAX_CHARS {
        return Err(ValidationError::CategoryTooLong {
            len,
            max: CATEGORY_MAX_CHARS,
        });
    }
    Ok(category.to_string())
}

fn validate_expertise(object: &Map<String, Value>) -> Result<ExpertiseLevel, ValidationError> {
    let Some((key, value)) = EXPERTISE_KEYS
        .iter()
        .find_map(|key| object.get(*key).map(|v| (*key, v)))
    else {
        return Err(ValidationError::MissingField("expertise_level"));
    };

    match value {
        Value::Number(n) => {
            if let Some(level) = n.as_i64() {
                ExpertiseLevel::new(level)
                    .ok_or_else(|| ValidationError::ExpertiseOutOfRange(level.to_string()))
            } else if n.is_u64() {
                Err(ValidationError::ExpertiseOutOfRange(n.to_string()))
            } else {
                Err(wrong_type(key, "an integer", value))
            }
        }
        other => Err(wrong_type(key, "an integer", other)),
    }
}

fn string_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(wrong_type(&format!("{}[{}]", field, i), "a string", other)),
            })
            .collect(),
        Some(other) => Err(wrong_type(field, "a list of strings", other)),
    }
}

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::WrongType {
        field: field.to_string(),
        expected,
        found: describe(found),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(_) | Value::String(_) | Value::Bool(_) => {
            format!("{} ({})", kind(value), value)
        }
        other => kind(other).to_string(),
    }
}

//! JSON recovery from oracle replies.
//!
//! Text-generation backends rarely return bare JSON: the object is usually
//! wrapped in prose or a markdown fence. [`extract_structured`] first tries a
//! strict parse of the whole reply, then parses the first balanced `{ ... }`
//! object in it. Nothing past that object is tried, so a fragment nested
//! inside a malformed reply is never mistaken for the answer.
//!
//! The outcome is a tagged [`ParseOutcome`] rather than an `Option`, so a
//! reply that could not be parsed is never confused with a parsed empty
//! value.
//!
//! ```
//! use insight_domain::analysis::parsing::{ParseOutcome, extract_structured};
//!
//! let reply = r#"Sure! {"category": "Tech"} Hope that helps."#;
//! assert_eq!(
//!     extract_structured(reply),
//!     ParseOutcome::Parsed(serde_json::json!({"category": "Tech"}))
//! );
//! assert!(!extract_structured("no json here").is_parsed());
//! ```

use serde_json::Value;

/// Result of trying to pull a structured value out of an oracle reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// A JSON value was recovered.
    Parsed(Value),
    /// Nothing parseable was found; carries the raw reply for diagnostics.
    Unparsed(String),
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }
}

/// Extract a JSON value from a possibly noisy reply. Never fails.
pub fn extract_structured(text: &str) -> ParseOutcome {
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return ParseOutcome::Parsed(value);
    }

    if let Some(candidate) = first_balanced_object(text)
        && let Ok(value) = serde_json::from_str::<Value>(candidate)
    {
        return ParseOutcome::Parsed(value);
    }

    ParseOutcome::Unparsed(text.to_string())
}

/// The `{ ... }` substring opened by the first `{` in `text`, if it closes.
///
/// Braces inside double-quoted strings are ignored, and backslash escapes
/// inside strings are honoured.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = balanced_end(&text.as_bytes()[start..])?;
    Some(&text[start..start + end + 1])
}

/// Offset of the `}` closing the `{` at `bytes[0]`, if the object closes.
///
/// `{`, `}`, `"` and `\` are ASCII, so byte offsets always land on UTF-8
/// boundaries.
fn balanced_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json_is_parsed_directly() {
        let outcome = extract_structured(r#"  {"category": "Billing", "expertise_level": 1}  "#);
        assert_eq!(
            outcome,
            ParseOutcome::Parsed(json!({"category": "Billing", "expertise_level": 1}))
        );
    }

    #[test]
    fn test_strict_parse_accepts_non_object_values() {
        assert_eq!(
            extract_structured(r#"[{"title": "Rust Book"}]"#),
            ParseOutcome::Parsed(json!([{"title": "Rust Book"}]))
        );
    }

    #[test]
    fn test_recovers_object_embedded_in_prose() {
        let embedded = r#"{"category":"Tech","expertise_level":2,"knowledge_gaps":["venv"],"recommendations":[]}"#;
        let reply = format!("Sure! Here is the result: {} Hope that helps.", embedded);

        let expected: Value = serde_json::from_str(embedded).unwrap();
        assert_eq!(extract_structured(&reply), ParseOutcome::Parsed(expected));
    }

    #[test]
    fn test_recovers_object_from_markdown_fence() {
        let reply = "Here you go:\n```json\n{\"category\": \"Python\", \"expertise_level\": 3}\n```\n";
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Parsed(json!({"category": "Python", "expertise_level": 3}))
        );
    }

    #[test]
    fn test_nested_objects_are_balanced() {
        let reply = r#"Result: {"outer": {"inner": {"x": 1}}, "y": 2} trailing } brace"#;
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Parsed(json!({"outer": {"inner": {"x": 1}}, "y": 2}))
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let reply = r#"ok {"category": "Sets {like} this }", "note": "quote \" and }"} done"#;
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Parsed(json!({"category": "Sets {like} this }", "note": "quote \" and }"}))
        );
    }

    #[test]
    fn test_only_first_object_is_tried() {
        let reply = r#"First {not json} then {"category": "Later"}"#;
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Unparsed(reply.to_string())
        );
    }

    #[test]
    fn test_nested_fragment_of_malformed_object_is_not_returned() {
        let reply = r#"{"category": "Tech", "expertise_level": 2, "meta": {"category": "Inner", "expertise_level": 5}, }"#;
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Unparsed(reply.to_string())
        );
    }

    #[test]
    fn test_nested_fragment_of_unclosed_object_is_not_returned() {
        let reply = r#"Here: {"category": "Tech", "meta": {"expertise_level": 5}"#;
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Unparsed(reply.to_string())
        );
    }

    #[test]
    fn test_unbalanced_reply_is_unparsed() {
        let reply = r#"Here: {"category": "Tech", "expertise_level": 2"#;
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Unparsed(reply.to_string())
        );
    }

    #[test]
    fn test_plain_prose_is_unparsed_with_raw_text() {
        let reply = "I'm sorry, I can't categorize these questions.";
        let outcome = extract_structured(reply);
        assert!(!outcome.is_parsed());
        assert_eq!(outcome, ParseOutcome::Unparsed(reply.to_string()));
    }

    #[test]
    fn test_multibyte_text_around_object() {
        let reply = "結果です: {\"category\": \"日本語\"} ありがとう";
        assert_eq!(
            extract_structured(reply),
            ParseOutcome::Parsed(json!({"category": "日本語"}))
        );
    }
}

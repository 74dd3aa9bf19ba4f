//! Validated analysis value objects.
//!
//! Instances are only created through [`super::validation`], so anything a
//! caller holds has already passed field validation.

use serde::Serialize;

/// Expertise estimate on a 1 (novice) to 5 (expert) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExpertiseLevel(u8);

impl ExpertiseLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` outside `1..=5`.
    pub fn new(level: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&level) {
            Some(Self(level as u8))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Structured analysis of one question group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupAnalysis {
    category: String,
    expertise_level: ExpertiseLevel,
    knowledge_gaps: Vec<String>,
    recommendations: Vec<String>,
}

impl GroupAnalysis {
    pub(crate) fn new(
        category: String,
        expertise_level: ExpertiseLevel,
        knowledge_gaps: Vec<String>,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            category,
            expertise_level,
            knowledge_gaps,
            recommendations,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn expertise_level(&self) -> ExpertiseLevel {
        self.expertise_level
    }

    pub fn knowledge_gaps(&self) -> &[String] {
        &self.knowledge_gaps
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

/// A learning resource suggested for the run as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecommendation {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

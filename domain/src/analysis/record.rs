//! Per-question analysis records for the record store.

use super::entities::GroupAnalysis;
use super::result::PipelineResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One analysed question, in the shape the record store expects.
///
/// `category` is already bounded to 255 characters by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub question_text: String,
    pub category: String,
    pub expertise_rating: u8,
    pub created_at: DateTime<Utc>,
    pub knowledge_gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AnalysisRecord {
    pub fn new(
        question_text: impl Into<String>,
        analysis: &GroupAnalysis,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_text: question_text.into(),
            category: analysis.category().to_string(),
            expertise_rating: analysis.expertise_level().value(),
            created_at,
            knowledge_gaps: analysis.knowledge_gaps().to_vec(),
            recommendations: analysis.recommendations().to_vec(),
        }
    }

    /// One record per question of every successfully analysed group, ordered
    /// by group label then input order. Failed groups yield no records.
    pub fn from_result(result: &PipelineResult, created_at: DateTime<Utc>) -> Vec<Self> {
        result
            .groups()
            .groups()
            .iter()
            .filter_map(|group| result.analysis(group.label()).map(|a| (group, a)))
            .flat_map(|(group, analysis)| {
                group
                    .questions()
                    .iter()
                    .map(move |q| Self::new(q.text(), analysis, created_at))
            })
            .collect()
    }
}

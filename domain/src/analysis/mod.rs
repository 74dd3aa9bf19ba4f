//! Structured analysis of question groups.
//!
//! Everything here is pure: turning a raw oracle reply into a
//! [`ParseOutcome`], validating parsed values into [`GroupAnalysis`] or
//! [`ResourceRecommendation`] lists, and combining per-group analyses into a
//! [`PipelineResult`].
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`parsing`] | JSON recovery from noisy natural-language replies |
//! | [`validation`] | Field domain checks, [`ValidationError`] |
//! | [`entities`] | Validated value objects |
//! | [`aggregate`] | Dominant category, expertise summary, gap union |
//! | [`result`] | Run-level [`PipelineResult`] |
//! | [`record`] | Persistence-compatible [`AnalysisRecord`] |

pub mod aggregate;
pub mod entities;
pub mod parsing;
pub mod record;
pub mod result;
pub mod validation;

pub use aggregate::{ExpertiseBand, ExpertiseSummary, dominant_category, union_knowledge_gaps};
pub use entities::{ExpertiseLevel, GroupAnalysis, ResourceRecommendation};
pub use parsing::{ParseOutcome, extract_structured};
pub use record::AnalysisRecord;
pub use result::{GroupFailure, PipelineResult};
pub use validation::{
    CATEGORY_MAX_CHARS, ValidationError, validate_group_analysis, validate_resources,
};

//! Run-level aggregation over per-group analyses.

use super::entities::GroupAnalysis;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Category with the highest occurrence count across groups.
///
/// Ties are resolved in favour of the category of the lowest-labelled group.
/// Returns `None` for an empty map.
pub fn dominant_category(analyses: &BTreeMap<usize, GroupAnalysis>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for analysis in analyses.values() {
        *counts.entry(analysis.category()).or_default() += 1;
    }

    // BTreeMap iterates labels ascending, so the first maximum seen wins ties.
    let mut best: Option<(&str, usize)> = None;
    for analysis in analyses.values() {
        let category = analysis.category();
        let count = counts[category];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.to_string())
}

/// Union of knowledge gaps in first-seen order (by group label), exact
/// duplicates removed.
pub fn union_knowledge_gaps(analyses: &BTreeMap<usize, GroupAnalysis>) -> Vec<String> {
    let mut seen = HashSet::new();
    analyses
        .values()
        .flat_map(|a| a.knowledge_gaps())
        .filter(|gap| seen.insert(gap.as_str()))
        .cloned()
        .collect()
}

/// Coarse expertise band used when talking about the run as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpertiseBand {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExpertiseBand {
    /// Band for a 1-5 level: 1-2 Beginner, 3 Intermediate, 4-5 Advanced.
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=2 => Self::Beginner,
            3 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for ExpertiseBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall expertise across every analysed group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpertiseSummary {
    /// Mean expertise level.
    pub mean: f64,
    /// `mean` rounded to the nearest level.
    pub level: u8,
    pub band: ExpertiseBand,
}

impl ExpertiseSummary {
    /// Summarise a set of levels, `None` when there are none.
    pub fn from_levels(levels: impl IntoIterator<Item = u8>) -> Option<Self> {
        let (sum, count) = levels
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), l| (sum + u64::from(l), count + 1));
        if count == 0 {
            return None;
        }

        let mean = sum as f64 / count as f64;
        let level = mean.round().clamp(1.0, 5.0) as u8;
        Some(Self {
            mean,
            level,
            band: ExpertiseBand::from_level(level),
        })
    }

    pub fn from_analyses(analyses: &BTreeMap<usize, GroupAnalysis>) -> Option<Self> {
        Self::from_levels(analyses.values().map(|a| a.expertise_level().value()))
    }
}

impl std::fmt::Display for ExpertiseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (mean {:.1}/5)", self.band, self.mean)
    }
}

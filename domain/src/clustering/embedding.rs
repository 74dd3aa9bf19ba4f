//! Embedding value object

use serde::{Deserialize, Serialize};

/// Fixed-length numeric representation of a question's text.
///
/// Ephemeral: recomputed on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding {
    vector: Vec<f32>,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.vector
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> f64 {
        self.vector
            .iter()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt()
    }

    /// Cosine distance `1 - cos(self, other)`, in `[0, 2]`.
    ///
    /// Identical vectors are at distance exactly `0.0` (this includes two
    /// zero vectors). A zero vector against any other vector is at
    /// distance `1.0`, i.e. treated as orthogonal.
    pub fn cosine_distance(&self, other: &Embedding) -> f64 {
        if self.vector == other.vector {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }

        let dot: f64 = self
            .vector
            .iter()
            .zip(&other.vector)
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum();
        let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
        (1.0 - similarity).max(0.0)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(vector: Vec<f32>) -> Self {
        Self::new(vector)
    }
}

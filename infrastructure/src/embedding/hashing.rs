//! Feature-hashing embedder
//!
//! Maps each question to a bag of word unigrams and adjacent-word bigrams,
//! hashed into a fixed number of buckets with a sign bit so collisions tend
//! to cancel rather than accumulate. Vectors are L2-normalised, so cosine
//! distance depends only on shared vocabulary, not on question length.

use super::stop_words::is_stop_word;
use async_trait::async_trait;
use insight_application::{EmbeddingError, TextEmbedder};
use insight_domain::Embedding;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic, dependency-free embedder based on signed feature hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingEmbedder {
    dimensions: usize,
    remove_stop_words: bool,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 256;

    /// Create an embedder with `dimensions` buckets (zero is treated as one).
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            remove_stop_words: true,
        }
    }

    pub fn with_stop_words(mut self, remove: bool) -> Self {
        self.remove_stop_words = remove;
        self
    }

    pub fn removes_stop_words(&self) -> bool {
        self.remove_stop_words
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed `texts` synchronously; never fails.
    pub fn embed_texts(&self, texts: &[&str]) -> Vec<Embedding> {
        texts.iter().map(|text| self.embed_one(text)).collect()
    }

    /// Lower-cased words of two or more characters, so contraction
    /// fragments like the `s` of "what's" carry no weight.
    fn tokens(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= 2)
            .map(str::to_lowercase)
            .filter(|t| !(self.remove_stop_words && is_stop_word(t)))
            .collect()
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimensions];
        let tokens = self.tokens(text);

        for token in &tokens {
            self.add_feature(&mut vector, token);
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]));
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Embedding::new(vector)
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str) {
        let hash = fnv1a(feature.as_bytes());
        let bucket = (hash % self.dimensions as u64) as usize;
        // Top bit chooses the sign; independent of the bucket bits for any
        // dimension count below 2^63.
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

#[async_trait]
impl TextEmbedder for HashingEmbedder {
    fn name(&self) -> &str {
        "feature-hashing"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(self.embed_texts(texts))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(embedder: &HashingEmbedder, a: &str, b: &str) -> f64 {
        let vectors = embedder.embed_texts(&[a, b]);
        vectors[0].cosine_distance(&vectors[1])
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_one_vector_per_text_in_order() {
        let embedder = HashingEmbedder::new(64);
        let vectors = embedder.embed_texts(&["first question", "second question", "third"]);
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.dimensions() == 64));
        assert_eq!(vectors[0], embedder.embed_texts(&["first question"])[0]);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let embedder = HashingEmbedder::default();
        let vector = &embedder.embed_texts(&["How do I parse JSON in Rust?"])[0];
        assert!((vector.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let a = HashingEmbedder::default().embed_texts(&["refund my order"]);
        let b = HashingEmbedder::default().embed_texts(&["refund my order"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::default();
        assert!(distance(&embedder, "Python lists?", "python LISTS") < 1e-9);
    }

    #[test]
    fn test_shared_vocabulary_is_closer() {
        let embedder = HashingEmbedder::default();
        let related = distance(
            &embedder,
            "How do I sort a list in Python?",
            "How do I reverse a list in Python?",
        );
        let unrelated = distance(
            &embedder,
            "How do I sort a list in Python?",
            "When will my refund arrive?",
        );
        assert!(related < unrelated);
    }

    #[test]
    fn test_stop_words_only_text_is_zero_vector() {
        let embedder = HashingEmbedder::default();
        let vector = &embedder.embed_texts(&["what is the"])[0];
        assert_eq!(vector.norm(), 0.0);

        let kept = HashingEmbedder::default().with_stop_words(false);
        assert!(kept.embed_texts(&["what is the"])[0].norm() > 0.0);
    }

    #[test]
    fn test_single_character_fragments_are_dropped() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.tokens("What's your refund policy?"), vec!["refund", "policy"]);
        assert_eq!(
            embedder.tokens("What's the difference between Python 2 and 3?"),
            vec!["difference", "between", "python"]
        );

        let kept = HashingEmbedder::default().with_stop_words(false);
        assert_eq!(kept.tokens("I'd use C"), vec!["use"]);
    }

    #[tokio::test]
    async fn test_port_matches_sync_embedding() {
        let embedder = HashingEmbedder::new(32);
        let texts = ["How do I install Python?", "What's your refund policy?"];
        let via_port = embedder.embed(&texts).await.unwrap();
        assert_eq!(via_port, embedder.embed_texts(&texts));
        assert_eq!(embedder.name(), "feature-hashing");
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let embedder = HashingEmbedder::new(0);
        assert_eq!(embedder.dimensions(), 1);
    }
}

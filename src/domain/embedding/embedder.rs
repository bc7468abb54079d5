//! Embedder trait and the built-in character-sum embedder

use std::fmt::Debug;

use super::similarity::normalize;

/// Maps query text to a fixed-length vector for similarity comparison.
///
/// Implementations must be deterministic and return unit-length vectors, or
/// the zero vector when the text carries no signal. A real embedding model
/// can be substituted behind this trait without touching cache logic.
pub trait Embedder: Send + Sync + Debug {
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Length of every vector returned by `embed`
    fn dimensions(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// Cheap lexical embedder: folds character code points into buckets by position.
///
/// Lowercases the text, adds each character's scalar value to bucket
/// `position % dimensions` and normalizes the result. It captures little
/// meaning; texts with the same characters in near-identical positions land
/// close together.
#[derive(Debug, Clone)]
pub struct CharSumEmbedder {
    dimensions: usize,
}

impl CharSumEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for CharSumEmbedder {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Embedder for CharSumEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        if self.dimensions == 0 {
            return Vec::new();
        }

        let mut sums = vec![0f64; self.dimensions];

        for (position, ch) in text.to_lowercase().chars().enumerate() {
            sums[position % self.dimensions] += f64::from(u32::from(ch));
        }

        let mut vector: Vec<f32> = sums.into_iter().map(|v| v as f32).collect();
        normalize(&mut vector);
        vector
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "char-sum"
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::similarity;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_fixed_dimension() {
        let embedder = CharSumEmbedder::new(10);

        assert_eq!(embedder.embed("hello").len(), 10);
        assert_eq!(embedder.embed("").len(), 10);
        assert_eq!(embedder.dimensions(), 10);
    }

    #[test]
    fn test_deterministic() {
        let embedder = CharSumEmbedder::default();

        assert_eq!(embedder.embed("What is Rust?"), embedder.embed("What is Rust?"));
    }

    #[test]
    fn test_unit_length() {
        let embedder = CharSumEmbedder::default();
        let v = embedder.embed("caching saves money");

        assert!((norm(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = CharSumEmbedder::default();

        assert_eq!(embedder.embed(""), vec![0.0; 10]);
    }

    #[test]
    fn test_case_insensitive() {
        let embedder = CharSumEmbedder::default();

        assert_eq!(embedder.embed("HELLO"), embedder.embed("hello"));
    }

    #[test]
    fn test_single_bucket_texts_are_identical_direction() {
        // Every character lands in bucket 0 when dimensions == 1
        let embedder = CharSumEmbedder::new(1);

        assert_eq!(embedder.embed("a"), vec![1.0]);
        assert_eq!(embedder.embed("zzz"), vec![1.0]);
    }

    #[test]
    fn test_near_duplicates_score_high() {
        let embedder = CharSumEmbedder::default();
        let a = embedder.embed("what is the capital of france");
        let b = embedder.embed("what is the capital of france?");

        assert!(similarity(&a, &b) > 0.95);
    }

    #[test]
    fn test_zero_dimensions_yields_empty_vector() {
        let embedder = CharSumEmbedder::new(0);

        assert!(embedder.embed("hello").is_empty());
    }
}

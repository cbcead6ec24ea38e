//! Deterministic hash-based embeddings

use sha2::{Digest, Sha256};

/// Local embedder deriving unit vectors from a SHA-256 digest
///
/// Identical text (after lower-casing and trimming) always yields an identical
/// vector. Components are non-negative, so any two vectors have positive
/// cosine similarity; beyond that, similarity carries no meaning.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.trim().to_lowercase().as_bytes());
        let len = digest.len();

        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|i| {
                let a = digest[(2 * i) % len] as f32;
                let b = digest[(2 * i + 1) % len] as f32;
                (a + b) / 510.0
            })
            .collect();

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vector.iter_mut().for_each(|x| *x /= magnitude);
        }

        vector
    }

    pub fn embed_all(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_unit_norm() {
        let embedder = HashEmbedder::new(1536);
        for text in ["US visa cost", "", "Schengen processing takes 15 days", "ñandú"] {
            let vector = embedder.embed(text);
            assert_eq!(vector.len(), 1536);
            assert!((norm(&vector) - 1.0).abs() < 1e-4, "norm of {:?}", text);
        }
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed("B1/B2 visa fee"), embedder.embed("B1/B2 visa fee"));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed("  Visa Fee \n"), embedder.embed("visa fee"));
        assert_ne!(embedder.embed("visa fee"), embedder.embed("visa fees"));
    }

    #[test]
    fn test_values_bounded_before_normalization() {
        let embedder = HashEmbedder::new(32);
        let vector = embedder.embed("bounded");
        assert!(vector.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn test_unrelated_texts_score_positive() {
        let embedder = HashEmbedder::new(1536);
        let query = embedder.embed("US visa cost");

        for text in [
            "B1/B2 visa fee $185. Processing takes 3-5 weeks.",
            "Tourist visa. B1/B2 visa fee $185",
            "Schengen processing takes 15 days",
            "",
        ] {
            let vector = embedder.embed(text);
            let dot: f32 = query.iter().zip(&vector).map(|(a, b)| a * b).sum();
            assert!(dot > 0.0, "{:?} scored {}", text, dot);
        }
    }
}

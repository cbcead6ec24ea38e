//! Fixed-size word window chunking strategy

use crate::domain::DomainError;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, TOKENS_PER_WORD};

/// Chunking strategy that slides a fixed word window over the document
#[derive(Debug, Clone, Default)]
pub struct FixedSizeChunker;

impl FixedSizeChunker {
    /// Create a new fixed-size chunker
    pub fn new() -> Self {
        Self
    }

    /// Window and stride in words for a token budget
    fn window(config: &ChunkingConfig) -> (usize, usize) {
        let window_words = ((config.chunk_size as f64 / TOKENS_PER_WORD) as usize).max(1);
        let overlap_words = (config.overlap as f64 / TOKENS_PER_WORD) as usize;
        let stride = window_words.saturating_sub(overlap_words).max(1);
        (window_words, stride)
    }
}

impl ChunkingStrategy for FixedSizeChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError> {
        config.validate()?;

        let words: Vec<&str> = content.split_whitespace().collect();
        let (window_words, stride) = Self::window(config);

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < words.len() {
            let end = (start + window_words).min(words.len());
            chunks.push(words[start..end].join(" "));

            if end == words.len() {
                break;
            }
            start += stride;
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::estimate_tokens;

    fn words(n: usize) -> String {
        (1..=n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_content() {
        let chunker = FixedSizeChunker::new();
        assert!(chunker.chunk("\n\t ", &ChunkingConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_window_conversion() {
        assert_eq!(FixedSizeChunker::window(&ChunkingConfig::new(500, 100)), (384, 308));
        assert_eq!(FixedSizeChunker::window(&ChunkingConfig::new(13, 3)), (10, 8));
        assert_eq!(FixedSizeChunker::window(&ChunkingConfig::new(1, 0)), (1, 1));
    }

    #[test]
    fn test_short_document_single_chunk() {
        let chunker = FixedSizeChunker::new();
        let chunks = chunker.chunk(&words(10), &ChunkingConfig::new(13, 3)).unwrap();
        assert_eq!(chunks, vec![words(10)]);
    }

    #[test]
    fn test_sliding_window() {
        let chunker = FixedSizeChunker::new();
        let chunks = chunker.chunk(&words(20), &ChunkingConfig::new(13, 3)).unwrap();

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("w1 ") && chunks[0].ends_with(" w10"));
        assert!(chunks[1].starts_with("w9 ") && chunks[1].ends_with(" w18"));
        assert!(chunks[2].starts_with("w17 ") && chunks[2].ends_with(" w20"));
    }

    #[test]
    fn test_covers_word_sequence_within_budget() {
        let chunker = FixedSizeChunker::new();
        let config = ChunkingConfig::new(50, 10);
        let text = words(237);

        let chunks = chunker.chunk(&text, &config).unwrap();

        let mut covered = std::collections::BTreeSet::new();
        for chunk in &chunks {
            assert!(estimate_tokens(chunk) <= config.chunk_size + config.overlap);
            covered.extend(chunk.split_whitespace().map(str::to_string));
        }
        assert_eq!(covered.len(), 237);
        assert!(chunks.last().unwrap().ends_with("w237"));
    }
}

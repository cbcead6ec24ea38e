//! Sentence-based chunking strategy

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, estimate_tokens};

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Chunking strategy that groups sentences up to the token budget
#[derive(Debug, Clone, Default)]
pub struct SentenceChunker;

impl SentenceChunker {
    /// Create a new sentence chunker
    pub fn new() -> Self {
        Self
    }

    /// Split after sentence-ending punctuation, keeping the punctuation
    fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in SENTENCE_END.find_iter(text) {
            // Punctuation is a single ASCII byte
            sentences.push(text[start..m.start() + 1].trim());
            start = m.end();
        }
        sentences.push(text[start..].trim());

        sentences.retain(|s| !s.is_empty());
        sentences
    }

    /// Most recent sentences that fit within the overlap budget
    fn overlap_sentences<'a>(sentences: &[&'a str], budget: usize) -> Vec<&'a str> {
        let mut kept = Vec::new();
        let mut tokens = 0;

        for sentence in sentences.iter().rev() {
            let sentence_tokens = estimate_tokens(sentence);
            if tokens + sentence_tokens > budget {
                break;
            }
            kept.push(*sentence);
            tokens += sentence_tokens;
        }

        kept.reverse();
        kept
    }
}

impl ChunkingStrategy for SentenceChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError> {
        config.validate()?;

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut fresh = false;

        for sentence in Self::split_sentences(content) {
            if fresh
                && estimate_tokens(&current.join(" ")) + estimate_tokens(sentence) > config.chunk_size
            {
                chunks.push(current.join(" "));
                current = Self::overlap_sentences(&current, config.overlap);
            }

            current.push(sentence);
            fresh = true;
        }

        if fresh {
            chunks.push(current.join(" "));
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "sentence"
    }
}

//! Paragraph-based chunking strategy

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, estimate_tokens};

/// Blank lines or the start of a numbered section
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+|\n[0-9]+\.\s+").unwrap());

/// Share of a flushed chunk (by characters) carried into the next one
const OVERLAP_RATIO: f64 = 0.2;

/// Chunking strategy that groups paragraphs up to the token budget
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker;

impl ParagraphChunker {
    /// Create a new paragraph chunker
    pub fn new() -> Self {
        Self
    }

    fn split_paragraphs(text: &str) -> Vec<&str> {
        PARAGRAPH_BREAK
            .split(text)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Trailing `ratio` of the text measured in characters
    fn tail(text: &str, ratio: f64) -> &str {
        let total = text.chars().count();
        let keep = (total as f64 * ratio) as usize;
        if keep == 0 {
            return "";
        }

        let start = text
            .char_indices()
            .nth(total - keep)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        &text[start..]
    }
}

impl ChunkingStrategy for ParagraphChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError> {
        config.validate()?;

        let mut chunks = Vec::new();
        let mut buffer = String::new();
        // Whether the buffer holds anything beyond the carried-over overlap
        let mut fresh = false;

        for paragraph in Self::split_paragraphs(content) {
            if fresh && estimate_tokens(&buffer) + estimate_tokens(paragraph) > config.chunk_size {
                let flushed = buffer.trim().to_string();
                buffer = Self::tail(&flushed, OVERLAP_RATIO).trim().to_string();
                chunks.push(flushed);
            }

            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(paragraph);
            fresh = true;
        }

        if fresh {
            chunks.push(buffer.trim().to_string());
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "paragraph"
    }
}

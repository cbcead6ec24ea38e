//! Chunking strategy trait and types

use std::fmt::{self, Debug};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::DomainError;
use crate::domain::knowledge_base::Metadata;

/// Approximate tokens per whitespace-separated word
pub const TOKENS_PER_WORD: f64 = 1.3;

/// Estimate the token count of a text
///
/// Shared by every strategy so that chunk budgets stay comparable.
pub fn estimate_tokens(text: &str) -> usize {
    (text.split_whitespace().count() as f64 * TOKENS_PER_WORD).round() as usize
}

/// Configuration for chunking, expressed in estimated tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in tokens
    pub overlap: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        if self.overlap >= self.chunk_size {
            return Err(DomainError::validation("overlap must be less than chunk_size"));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 100,
        }
    }
}

/// Chunking strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingType {
    /// Split by blank lines and numbered sections
    #[default]
    Paragraph,
    /// Split by sentence-ending punctuation
    Sentence,
    /// Sliding word window
    FixedSize,
}

impl ChunkingType {
    /// Canonical name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Sentence => "sentence",
            Self::FixedSize => "fixed",
        }
    }

    /// Parse a strategy name, degrading to paragraphs for anything unknown
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(strategy = %value, "Unknown chunking strategy, defaulting to paragraphs");
            Self::Paragraph
        })
    }
}

impl FromStr for ChunkingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paragraph" | "paragraphs" => Ok(Self::Paragraph),
            "sentence" | "sentences" => Ok(Self::Sentence),
            "fixed" | "fixed_size" => Ok(Self::FixedSize),
            other => Err(DomainError::validation(format!(
                "Unknown chunking strategy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ChunkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chunk of a document, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `<document id>_chunk_<sequence>`, sequence starting at 1
    pub id: String,
    /// Chunk text
    pub text: String,
    /// Parent metadata plus `chunk_index` and `tokens`
    pub metadata: Metadata,
}

impl Chunk {
    /// Build a chunk for a parent document
    pub fn new(doc_id: &str, sequence: usize, text: impl Into<String>, parent: &Metadata) -> Self {
        let text = text.into();
        let mut metadata = parent.clone();
        metadata.insert("chunk_index".to_string(), sequence.into());
        metadata.insert("tokens".to_string(), estimate_tokens(&text).into());

        Self {
            id: format!("{}_chunk_{}", doc_id, sequence),
            text,
            metadata,
        }
    }

    /// 1-based position within the parent document
    pub fn index(&self) -> Option<u64> {
        self.metadata.get("chunk_index").and_then(|v| v.as_u64())
    }

    /// Estimated token count
    pub fn tokens(&self) -> Option<u64> {
        self.metadata.get("tokens").and_then(|v| v.as_u64())
    }
}

/// Trait for chunking strategies
///
/// Strategies return chunk texts in document order; identifiers and metadata
/// are assigned by the caller.
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunk texts
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("   \n "), 0);
        assert_eq!(estimate_tokens("one"), 1);
        assert_eq!(estimate_tokens("one two"), 3);
        assert_eq!(estimate_tokens("a b c d e f g h i j"), 13);
    }

    #[test]
    fn test_chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.overlap, 100);
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::new(100, 50).validate().is_ok());
        assert!(ChunkingConfig::new(100, 0).validate().is_ok());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
        assert!(ChunkingConfig::new(100, 100).validate().is_err());
    }

    #[test]
    fn test_chunking_type_parse() {
        assert_eq!("paragraphs".parse::<ChunkingType>().unwrap(), ChunkingType::Paragraph);
        assert_eq!("Sentence".parse::<ChunkingType>().unwrap(), ChunkingType::Sentence);
        assert_eq!("fixed_size".parse::<ChunkingType>().unwrap(), ChunkingType::FixedSize);
        assert!("semantic".parse::<ChunkingType>().is_err());
    }

    #[test]
    fn test_chunking_type_unknown_degrades_to_paragraph() {
        assert_eq!(ChunkingType::parse_or_default("semantic"), ChunkingType::Paragraph);
        assert_eq!(ChunkingType::parse_or_default("fixed"), ChunkingType::FixedSize);
    }

    #[test]
    fn test_chunk_new_inherits_metadata() {
        let mut parent = Metadata::new();
        parent.insert("country".into(), "USA".into());

        let chunk = Chunk::new("visa_us_b1", 2, "fee is $185", &parent);

        assert_eq!(chunk.id, "visa_us_b1_chunk_2");
        assert_eq!(chunk.index(), Some(2));
        assert_eq!(chunk.tokens(), Some(4));
        assert_eq!(chunk.metadata.get("country"), Some(&serde_json::json!("USA")));
    }
}

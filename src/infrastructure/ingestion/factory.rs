//! Factory for creating chunkers

use std::sync::Arc;

use crate::domain::ingestion::{ChunkingStrategy, ChunkingType};

use super::chunkers::{FixedSizeChunker, ParagraphChunker, SentenceChunker};

/// Factory for creating chunking strategies
#[derive(Debug, Default)]
pub struct ChunkerFactory;

impl ChunkerFactory {
    /// Create a chunker for the given type
    pub fn create(chunking_type: ChunkingType) -> Arc<dyn ChunkingStrategy> {
        match chunking_type {
            ChunkingType::FixedSize => Arc::new(FixedSizeChunker::new()),
            ChunkingType::Sentence => Arc::new(SentenceChunker::new()),
            ChunkingType::Paragraph => Arc::new(ParagraphChunker::new()),
        }
    }

    /// Get a list of all available chunking types
    pub fn available_types() -> Vec<ChunkingType> {
        vec![
            ChunkingType::Paragraph,
            ChunkingType::Sentence,
            ChunkingType::FixedSize,
        ]
    }
}

//! Document ingestion infrastructure
//!
//! Chunking strategies, their factory and the document chunking service.

pub mod chunkers;
pub mod document_chunker;
pub mod factory;

pub use chunkers::{FixedSizeChunker, ParagraphChunker, SentenceChunker};
pub use document_chunker::DocumentChunker;
pub use factory::ChunkerFactory;

//! Chunking strategy implementations

mod fixed_size;
mod paragraph;
mod sentence;

pub use fixed_size::FixedSizeChunker;
pub use paragraph::ParagraphChunker;
pub use sentence::SentenceChunker;

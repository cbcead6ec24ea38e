//! Document chunking domain types and traits

pub mod chunker;

pub use chunker::{
    Chunk, ChunkingConfig, ChunkingStrategy, ChunkingType, TOKENS_PER_WORD, estimate_tokens,
};

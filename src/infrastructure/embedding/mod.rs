//! Embedding implementations

mod embedder;
mod hash;
mod openai;

pub use embedder::{DEFAULT_BATCH_SIZE, DEFAULT_DIMENSIONS, DEFAULT_TIMEOUT, Embedder};
pub use hash::HashEmbedder;
pub use openai::{DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL, OpenAiEmbeddingProvider};

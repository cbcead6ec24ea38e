//! Vector store implementations

mod local;
mod pinecone;

pub use local::{DEFAULT_CACHE_PATH, LocalVectorStore};
pub use pinecone::{DEFAULT_CONTROLLER_URL, DEFAULT_INDEX_NAME, PineconeIndex};

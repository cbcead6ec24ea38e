//! Knowledge base loaders

mod in_memory;
mod json_loader;
mod supplementary;

pub use in_memory::InMemoryKnowledgeBase;
pub use json_loader::{DEFAULT_KNOWLEDGE_BASE_PATH, JsonKnowledgeBaseLoader};
pub use supplementary::supplementary_documents;

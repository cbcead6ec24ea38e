//! Knowledge base domain - documents, metadata filters and loaders

mod document;
mod filter;
mod loader;

pub use document::{Document, Metadata};
pub use filter::MetadataFilter;
pub use loader::KnowledgeBaseLoader;

#[cfg(test)]
pub use loader::MockKnowledgeBaseLoader;

//! Vector store records and results

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::Metadata;

/// An embedded chunk held by a vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl CacheRecord {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        embedding: Vec<f32>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
            metadata,
        }
    }
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub id: String,
    pub text: String,
    /// Cosine similarity in `[-1, 1]`
    pub score: f32,
    pub metadata: Metadata,
}

/// Local store diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_documents: usize,
    pub total_embeddings: usize,
    /// Path of the backing file
    pub backing_store: String,
    /// Whether the backing file exists
    pub exists: bool,
}

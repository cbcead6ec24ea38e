//! Knowledge base document entity

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata attached to documents, chunks and cache records
pub type Metadata = HashMap<String, serde_json::Value>;

/// A source document produced by knowledge base extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for the document
    pub id: String,
    /// Document body
    pub text: String,
    /// Metadata key-value pairs (strings, numbers or booleans)
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a new document without metadata
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace all metadata
    pub fn with_all_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Get a metadata value as a string, if present and a string
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

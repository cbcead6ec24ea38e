//! Remote vector index trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::knowledge_base::{Metadata, MetadataFilter};

#[cfg(test)]
use mockall::automock;

/// Vector written to a remote index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorUpsert {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Metadata,
}

/// Match returned by a remote index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Managed similarity search service used as the primary retrieval backend
///
/// Every failure is reported as an error; deciding whether to fall back is
/// left to the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteVectorIndex: Send + Sync {
    /// Configured index name
    fn index_name(&self) -> String;

    /// Resolve the index and verify it is reachable
    async fn connect(&self) -> Result<(), DomainError>;

    /// Insert or replace vectors, returning the upserted count
    async fn upsert(&self, vectors: Vec<VectorUpsert>) -> Result<usize, DomainError>;

    /// Nearest neighbours of `vector` among records matching `filter`
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<RemoteMatch>, DomainError>;
}

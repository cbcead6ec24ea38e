//! Knowledge base loader trait

use async_trait::async_trait;

use super::Document;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Source of the raw documents that feed the retrieval pipeline
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseLoader: Send + Sync {
    /// Load every document of the knowledge base
    ///
    /// A failure here is the only unrecoverable error of initialization.
    async fn load(&self) -> Result<Vec<Document>, DomainError>;

    /// Human-readable description of where documents come from
    fn describe(&self) -> String;
}

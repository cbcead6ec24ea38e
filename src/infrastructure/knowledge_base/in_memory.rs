//! Fixed in-memory knowledge base for development and testing

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::knowledge_base::{Document, KnowledgeBaseLoader};

/// Loader that returns a fixed list of documents
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeBase {
    documents: Vec<Document>,
}

impl InMemoryKnowledgeBase {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl KnowledgeBaseLoader for InMemoryKnowledgeBase {
    async fn load(&self) -> Result<Vec<Document>, DomainError> {
        Ok(self.documents.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} documents)", self.documents.len())
    }
}

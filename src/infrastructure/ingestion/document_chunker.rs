//! Document chunking service

use tracing::{debug, info};

use crate::domain::DomainError;
use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingType};
use crate::domain::knowledge_base::{Document, Metadata};

use super::factory::ChunkerFactory;

/// Splits knowledge base documents into identified chunks
#[derive(Debug, Clone)]
pub struct DocumentChunker {
    config: ChunkingConfig,
}

impl DocumentChunker {
    /// Create a chunker, validating the token budget
    pub fn new(config: ChunkingConfig) -> Result<Self, DomainError> {
        config.validate()?;
        info!(
            chunk_size = config.chunk_size,
            overlap = config.overlap,
            "DocumentChunker initialized"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk raw text carrying the given metadata
    pub fn chunk(
        &self,
        doc_id: &str,
        text: &str,
        metadata: &Metadata,
        strategy: ChunkingType,
    ) -> Result<Vec<Chunk>, DomainError> {
        let chunker = ChunkerFactory::create(strategy);
        let texts = chunker.chunk(text, &self.config)?;

        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(doc_id, i + 1, text, metadata))
            .collect())
    }

    /// Chunk a single document
    pub fn chunk_document(
        &self,
        document: &Document,
        strategy: ChunkingType,
    ) -> Result<Vec<Chunk>, DomainError> {
        self.chunk(&document.id, &document.text, &document.metadata, strategy)
    }

    /// Chunk many documents, skipping those without text
    pub fn chunk_documents(
        &self,
        documents: &[Document],
        strategy: ChunkingType,
    ) -> Result<Vec<Chunk>, DomainError> {
        let mut all_chunks = Vec::new();

        for document in documents.iter().filter(|d| !d.text.trim().is_empty()) {
            let chunks = self.chunk_document(document, strategy)?;
            debug!(document_id = %document.id, chunks = chunks.len(), "Chunked document");
            all_chunks.extend(chunks);
        }

        info!(total = all_chunks.len(), strategy = %strategy, "Total chunks created");
        Ok(all_chunks)
    }
}

impl Default for DocumentChunker {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}

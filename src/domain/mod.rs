//! Domain layer - core retrieval types, traits and errors

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;
pub mod retrieval;
pub mod validation;
pub mod vector_store;

pub use embedding::{EmbeddingOutcome, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{Chunk, ChunkingConfig, ChunkingStrategy, ChunkingType};
pub use knowledge_base::{Document, KnowledgeBaseLoader, Metadata, MetadataFilter};
pub use retrieval::{
    ContextDocument, ContextRetriever, OrchestratorState, RagStatus, RetrievalContext,
    RetrievalQuery, RetrievalSource,
};
pub use vector_store::{
    CacheRecord, RemoteMatch, RemoteVectorIndex, RetrievalResult, StoreStats, VectorUpsert,
    cosine_similarity,
};

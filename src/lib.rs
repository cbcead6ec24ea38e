//! VisaBuddy RAG engine
//!
//! Retrieval for the visa assistant:
//! - Paragraph, sentence and fixed-window chunking
//! - Remote embeddings with a deterministic local fallback
//! - Pinecone index backed by an always-warm local vector cache
//! - Keyword-coverage validation of retrieval quality

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use domain::embedding::EmbeddingProvider;
use domain::vector_store::RemoteVectorIndex;
use infrastructure::{
    embedding::{Embedder, OpenAiEmbeddingProvider},
    http::HttpClient,
    ingestion::DocumentChunker,
    knowledge_base::JsonKnowledgeBaseLoader,
    services::RetrievalOrchestrator,
    vector_store::{LocalVectorStore, PineconeIndex},
};

/// Wire the retrieval pipeline from configuration
///
/// Missing credentials select the local embedding fallback and disable the
/// remote index; they are not errors.
pub fn build_orchestrator(config: &AppConfig) -> anyhow::Result<RetrievalOrchestrator> {
    let loader = JsonKnowledgeBaseLoader::new(&config.knowledge_base.path)
        .with_supplementary(config.knowledge_base.include_supplementary);

    let chunker = DocumentChunker::new(config.chunking.config())?;
    let embedder = create_embedder(config);
    let store = LocalVectorStore::open(&config.cache.path);

    let mut orchestrator = RetrievalOrchestrator::new(Arc::new(loader), embedder, store)
        .with_chunking(chunker, config.chunking.chunking_type())
        .with_upsert_batch_size(config.remote_index.upsert_batch_size)
        .with_default_top_k(config.retrieval.default_top_k);

    if let Some(remote) = create_remote_index(config)? {
        orchestrator = orchestrator.with_remote(remote);
    }

    Ok(orchestrator)
}

fn create_embedder(config: &AppConfig) -> Embedder {
    let settings = &config.embedding;

    let provider = settings.api_key.as_ref().map(|api_key| {
        info!(model = %settings.model, base_url = %settings.base_url, "Using remote embedding provider");
        let provider = OpenAiEmbeddingProvider::with_base_url(HttpClient::new(), api_key, &settings.base_url)
            .with_model(&settings.model);
        Arc::new(provider) as Arc<dyn EmbeddingProvider>
    });

    Embedder::new(provider, settings.dimensions)
        .with_batch_size(settings.batch_size)
        .with_timeout(Duration::from_secs(settings.timeout_secs))
}

fn create_remote_index(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn RemoteVectorIndex>>> {
    let settings = &config.remote_index;

    let Some(api_key) = &settings.api_key else {
        info!("No remote index credentials, local cache only");
        return Ok(None);
    };

    let timeout = Duration::from_secs(settings.timeout_secs);
    let index = PineconeIndex::new(HttpClient::with_timeout(timeout)?, api_key, &settings.index_name)
        .with_controller_url(&settings.controller_url)
        .with_timeout(timeout);

    Ok(Some(Arc::new(index)))
}

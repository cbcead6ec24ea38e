//! Retrieval orchestrator - ingestion pipeline and two-tier retrieval

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::DomainError;
use crate::domain::ingestion::{Chunk, ChunkingType};
use crate::domain::knowledge_base::{KnowledgeBaseLoader, MetadataFilter};
use crate::domain::retrieval::{
    ContextDocument, ContextRetriever, OrchestratorState, RagStatus, RetrievalContext,
    RetrievalQuery, RetrievalSource,
};
use crate::domain::vector_store::{CacheRecord, RemoteVectorIndex, VectorUpsert};
use crate::infrastructure::embedding::Embedder;
use crate::infrastructure::ingestion::DocumentChunker;
use crate::infrastructure::vector_store::LocalVectorStore;

pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 100;
pub const DEFAULT_TOP_K: usize = 5;

/// Owns the knowledge base pipeline and serves retrieval queries
///
/// Queries prefer the remote index and fall back to the local store. Nothing
/// on the retrieval path returns an error.
pub struct RetrievalOrchestrator {
    loader: Arc<dyn KnowledgeBaseLoader>,
    chunker: DocumentChunker,
    strategy: ChunkingType,
    embedder: Embedder,
    store: RwLock<LocalVectorStore>,
    remote: Option<Arc<dyn RemoteVectorIndex>>,
    upsert_batch_size: usize,
    default_top_k: usize,
    state: RwLock<OrchestratorState>,
    remote_available: AtomicBool,
    cache_populated: AtomicBool,
    documents_indexed: AtomicUsize,
    /// Chunk text by id, used to resolve remote matches
    corpus: RwLock<HashMap<String, String>>,
}

impl std::fmt::Debug for RetrievalOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalOrchestrator")
            .field("loader", &self.loader.describe())
            .field("strategy", &self.strategy)
            .field("embedder", &self.embedder.id())
            .field("remote", &self.remote.as_ref().map(|r| r.index_name()))
            .finish()
    }
}

impl RetrievalOrchestrator {
    pub fn new(loader: Arc<dyn KnowledgeBaseLoader>, embedder: Embedder, store: LocalVectorStore) -> Self {
        Self {
            loader,
            chunker: DocumentChunker::default(),
            strategy: ChunkingType::default(),
            embedder,
            store: RwLock::new(store),
            remote: None,
            upsert_batch_size: DEFAULT_UPSERT_BATCH_SIZE,
            default_top_k: DEFAULT_TOP_K,
            state: RwLock::new(OrchestratorState::Uninitialized),
            remote_available: AtomicBool::new(false),
            cache_populated: AtomicBool::new(false),
            documents_indexed: AtomicUsize::new(0),
            corpus: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_chunking(mut self, chunker: DocumentChunker, strategy: ChunkingType) -> Self {
        self.chunker = chunker;
        self.strategy = strategy;
        self
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteVectorIndex>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_upsert_batch_size(mut self, batch_size: usize) -> Self {
        self.upsert_batch_size = batch_size.max(1);
        self
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub async fn state(&self) -> OrchestratorState {
        *self.state.read().await
    }

    /// Load, chunk, embed and index the knowledge base
    ///
    /// Returns false only when the knowledge base cannot be loaded or chunked.
    pub async fn initialize(&self) -> bool {
        *self.state.write().await = OrchestratorState::Initializing;
        info!(source = %self.loader.describe(), strategy = %self.strategy, "Initializing RAG pipeline");

        let chunks = match self.load_chunks().await {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(error = %e, "Failed to load knowledge base");
                *self.state.write().await = OrchestratorState::Failed;
                return false;
            }
        };

        self.connect_remote().await;

        let records = self.embed_chunks(chunks).await;

        if self.remote_available.load(Ordering::SeqCst) && !records.is_empty() {
            self.upsert_remote(&records).await;
        }

        self.populate_cache(records).await;

        *self.state.write().await = OrchestratorState::Ready;
        info!(
            documents = self.documents_indexed.load(Ordering::SeqCst),
            remote = self.remote_available.load(Ordering::SeqCst),
            fallback_embeddings = self.embedder.is_using_fallback(),
            "RAG pipeline ready"
        );
        true
    }

    async fn load_chunks(&self) -> Result<Vec<Chunk>, DomainError> {
        let documents = self.loader.load().await?;
        info!(count = documents.len(), "Loaded knowledge base documents");
        self.chunker.chunk_documents(&documents, self.strategy)
    }

    async fn connect_remote(&self) {
        let Some(remote) = &self.remote else {
            debug!("No remote vector index configured");
            self.remote_available.store(false, Ordering::SeqCst);
            return;
        };

        match remote.connect().await {
            Ok(()) => {
                info!(index = %remote.index_name(), "Connected to remote vector index");
                self.remote_available.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                warn!(index = %remote.index_name(), error = %e, "Remote vector index unavailable, using local cache");
                self.remote_available.store(false, Ordering::SeqCst);
            }
        }
    }

    async fn embed_chunks(&self, chunks: Vec<Chunk>) -> Vec<CacheRecord> {
        self.embedder.unpin();

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let outcome = self.embedder.embed_many(&texts).await;

        if let Some(reason) = outcome.reason() {
            warn!(reason, count = texts.len(), "Corpus embedded with local fallback");
            self.embedder.pin_to_fallback();
        }

        chunks
            .into_iter()
            .zip(outcome.into_value())
            .map(|(chunk, embedding)| CacheRecord::new(chunk.id, chunk.text, embedding, chunk.metadata))
            .collect()
    }

    async fn upsert_remote(&self, records: &[CacheRecord]) {
        let Some(remote) = &self.remote else {
            return;
        };

        let mut upserted = 0;
        for batch in records.chunks(self.upsert_batch_size) {
            let vectors = batch
                .iter()
                .map(|r| VectorUpsert {
                    id: r.id.clone(),
                    values: r.embedding.clone(),
                    metadata: r.metadata.clone(),
                })
                .collect();

            match remote.upsert(vectors).await {
                Ok(count) => upserted += count,
                Err(e) => {
                    warn!(error = %e, upserted, "Remote upsert failed, disabling remote index");
                    self.remote_available.store(false, Ordering::SeqCst);
                    return;
                }
            }
        }

        info!(count = upserted, index = %remote.index_name(), "Upserted vectors to remote index");
    }

    async fn populate_cache(&self, records: Vec<CacheRecord>) {
        let corpus: HashMap<String, String> =
            records.iter().map(|r| (r.id.clone(), r.text.clone())).collect();

        let mut store = self.store.write().await;
        if let Err(e) = store.replace_all(records).await {
            // Records stay searchable in memory
            warn!(error = %e, "Failed to persist vector cache");
        }

        self.cache_populated.store(!store.is_empty(), Ordering::SeqCst);
        self.documents_indexed.store(store.len(), Ordering::SeqCst);
        *self.corpus.write().await = corpus;
    }

    async fn query_remote(
        &self,
        remote: &dyn RemoteVectorIndex,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<ContextDocument>, DomainError> {
        let matches = remote.query(vector, top_k, filter).await?;
        let corpus = self.corpus.read().await;

        Ok(matches
            .into_iter()
            .map(|m| {
                let content = corpus
                    .get(&m.id)
                    .cloned()
                    .unwrap_or_else(|| format!("Document: {}", m.id));
                ContextDocument::from_metadata(&m.metadata, m.score, content)
            })
            .collect())
    }

    async fn query_cache(&self, vector: &[f32], top_k: usize, filter: &MetadataFilter) -> Vec<ContextDocument> {
        self.store
            .read()
            .await
            .search(vector, top_k, filter)
            .into_iter()
            .map(|r| ContextDocument::from_metadata(&r.metadata, r.score, r.text))
            .collect()
    }

    /// Ranked context for a query: remote index, then local cache, then empty
    pub async fn retrieve(&self, query: RetrievalQuery) -> RetrievalContext {
        if !self.state().await.is_ready() {
            warn!("RAG pipeline not initialized, returning empty context");
            return RetrievalContext::empty(query.query);
        }

        let embedding = self.embedder.embed_one(&query.query).await;
        if let Some(reason) = embedding.reason() {
            debug!(reason, "Query embedded with local fallback");
        }
        let vector = embedding.into_value();
        let filter = query.filter();

        if let Some(remote) = self.remote.as_ref().filter(|_| self.remote_available.load(Ordering::SeqCst)) {
            match self.query_remote(remote.as_ref(), &vector, query.top_k, &filter).await {
                Ok(documents) => {
                    info!(count = documents.len(), source = "remote", "Retrieved context");
                    return RetrievalContext::new(query.query, documents, RetrievalSource::Remote);
                }
                Err(e) => {
                    warn!(error = %e, "Remote query failed, falling back to local cache");
                }
            }
        }

        if self.cache_populated.load(Ordering::SeqCst) {
            let documents = self.query_cache(&vector, query.top_k, &filter).await;
            info!(count = documents.len(), source = "cache", "Retrieved context");
            return RetrievalContext::new(query.query, documents, RetrievalSource::Cache);
        }

        warn!("No retrieval backend available");
        RetrievalContext::empty(query.query)
    }

    pub async fn status(&self) -> RagStatus {
        let state = self.state().await;
        RagStatus {
            state,
            initialized: state.is_ready(),
            remote_available: self.remote_available.load(Ordering::SeqCst),
            cache_populated: self.cache_populated.load(Ordering::SeqCst),
            documents_indexed: self.documents_indexed.load(Ordering::SeqCst),
            using_fallback_embeddings: self.embedder.is_using_fallback(),
            embedder: self.embedder.id(),
            cache_stats: self.store.read().await.stats(),
        }
    }

    /// Empty the local cache and delete its backing file
    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        self.store.write().await.clear().await?;
        self.cache_populated.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ContextRetriever for RetrievalOrchestrator {
    async fn retrieve_context(&self, query: RetrievalQuery) -> RetrievalContext {
        self.retrieve(query).await
    }
}

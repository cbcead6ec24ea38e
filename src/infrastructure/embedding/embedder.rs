//! Embedder with remote provider and deterministic fallback

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use super::HashEmbedder;
use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingOutcome, EmbeddingProvider, EmbeddingRequest};

pub const DEFAULT_DIMENSIONS: usize = 1536;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps text to fixed-dimension vectors; never fails
///
/// Uses the configured provider in batches, each bounded by the timeout. Any
/// provider failure, timeout or malformed response degrades the call to the
/// hash fallback.
#[derive(Debug)]
pub struct Embedder {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    fallback: HashEmbedder,
    batch_size: usize,
    timeout: Duration,
    pinned_to_fallback: AtomicBool,
}

impl Embedder {
    pub fn new(provider: Option<Arc<dyn EmbeddingProvider>>, dimensions: usize) -> Self {
        if provider.is_none() {
            warn!("No embedding provider configured, using local embedding fallback");
        }

        Self {
            provider,
            fallback: HashEmbedder::new(dimensions),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            pinned_to_fallback: AtomicBool::new(false),
        }
    }

    /// Embedder that only uses the hash fallback
    pub fn local(dimensions: usize) -> Self {
        Self::new(None, dimensions)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.fallback.dimensions()
    }

    /// Identifier of the configured embedding path
    pub fn id(&self) -> String {
        match &self.provider {
            Some(provider) => format!("{}:{}", provider.provider_name(), provider.model()),
            None => "local:sha256".to_string(),
        }
    }

    /// Whether vectors currently come from the hash fallback
    pub fn is_using_fallback(&self) -> bool {
        self.provider.is_none() || self.pinned_to_fallback.load(Ordering::SeqCst)
    }

    /// Keep using the fallback, so queries stay comparable to a corpus embedded with it
    pub fn pin_to_fallback(&self) {
        self.pinned_to_fallback.store(true, Ordering::SeqCst);
    }

    /// Drop a previous pin, e.g. before re-embedding the corpus
    pub fn unpin(&self) {
        self.pinned_to_fallback.store(false, Ordering::SeqCst);
    }

    pub async fn embed_one(&self, text: &str) -> EmbeddingOutcome<Vec<f32>> {
        let texts = [text.to_string()];
        self.embed_many(&texts).await.map(|vectors| {
            vectors
                .into_iter()
                .next()
                .unwrap_or_else(|| self.fallback.embed(text))
        })
    }

    /// One vector per input, in input order
    pub async fn embed_many(&self, texts: &[String]) -> EmbeddingOutcome<Vec<Vec<f32>>> {
        let provider = match &self.provider {
            Some(provider) if !self.pinned_to_fallback.load(Ordering::SeqCst) => provider,
            Some(_) => {
                return EmbeddingOutcome::degraded(
                    self.fallback.embed_all(texts),
                    "pinned to local fallback",
                );
            }
            None => {
                return EmbeddingOutcome::degraded(
                    self.fallback.embed_all(texts),
                    "no embedding provider configured",
                );
            }
        };

        match self.embed_remote(provider.as_ref(), texts).await {
            Ok(vectors) => EmbeddingOutcome::Ok(vectors),
            Err(e) => {
                warn!(error = %e, count = texts.len(), "Embedding provider failed, using local fallback");
                EmbeddingOutcome::degraded(self.fallback.embed_all(texts), e.to_string())
            }
        }
    }

    async fn embed_remote(
        &self,
        provider: &dyn EmbeddingProvider,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let request =
                EmbeddingRequest::new(provider.model(), batch).with_dimensions(self.dimensions());

            let response = tokio::time::timeout(self.timeout, provider.embed(request))
                .await
                .map_err(|_| {
                    DomainError::timeout(format!(
                        "Embedding request exceeded {}ms",
                        self.timeout.as_millis()
                    ))
                })??;

            let batch_vectors = response.into_vectors();
            if batch_vectors.len() != batch.len() {
                return Err(DomainError::provider(
                    provider.provider_name(),
                    format!(
                        "Expected {} embeddings, received {}",
                        batch.len(),
                        batch_vectors.len()
                    ),
                ));
            }
            if let Some(bad) = batch_vectors.iter().find(|v| v.len() != self.dimensions()) {
                return Err(DomainError::provider(
                    provider.provider_name(),
                    format!(
                        "Expected dimension {}, received {}",
                        self.dimensions(),
                        bad.len()
                    ),
                ));
            }

            debug!(batch = batch_index + 1, size = batch.len(), "Embedded batch");
            vectors.extend(batch_vectors);
        }

        Ok(vectors)
    }
}

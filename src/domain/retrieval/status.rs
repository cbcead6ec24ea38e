//! Orchestrator lifecycle and diagnostics

use serde::{Deserialize, Serialize};

use crate::domain::vector_store::StoreStats;

/// Lifecycle of the retrieval pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl OrchestratorState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Read-only diagnostics for ops endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagStatus {
    pub state: OrchestratorState,
    pub initialized: bool,
    pub remote_available: bool,
    pub cache_populated: bool,
    pub documents_indexed: usize,
    pub using_fallback_embeddings: bool,
    /// `openai:<model>` or `local:sha256`
    pub embedder: String,
    pub cache_stats: StoreStats,
}

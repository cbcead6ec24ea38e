//! Shared handler state

use std::sync::Arc;

use crate::infrastructure::services::RetrievalOrchestrator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: Arc<RetrievalOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<RetrievalOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

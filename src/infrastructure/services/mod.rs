//! Infrastructure services

mod retrieval_service;
mod validator;

pub use retrieval_service::{DEFAULT_TOP_K, DEFAULT_UPSERT_BATCH_SIZE, RetrievalOrchestrator};
pub use validator::{QUALITY_QUERY, QUALITY_TOP_K, RetrievalValidator, SUITE_TOP_K};

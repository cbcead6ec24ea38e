//! Retrieval domain - queries, context and orchestrator status

mod context;
mod retriever;
mod status;

pub use context::{ContextDocument, RetrievalContext, RetrievalQuery, RetrievalSource};
pub use retriever::ContextRetriever;
pub use status::{OrchestratorState, RagStatus};

#[cfg(test)]
pub use retriever::MockContextRetriever;

//! Embedding provider domain models and traits

mod outcome;
mod provider;
mod request;
mod response;

pub use outcome::EmbeddingOutcome;
pub use provider::EmbeddingProvider;
pub use request::EmbeddingRequest;
pub use response::{Embedding, EmbeddingResponse, EmbeddingUsage};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;

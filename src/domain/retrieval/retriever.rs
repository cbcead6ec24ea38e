//! Context retrieval trait

use async_trait::async_trait;

use super::{RetrievalContext, RetrievalQuery};

#[cfg(test)]
use mockall::automock;

/// Single externally visible retrieval operation
///
/// Implementations never fail: every error degrades to a valid, possibly
/// empty, context.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn retrieve_context(&self, query: RetrievalQuery) -> RetrievalContext;
}

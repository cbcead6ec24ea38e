//! Vector store domain - records, similarity and the remote index seam

mod record;
mod remote;
mod similarity;

pub use record::{CacheRecord, RetrievalResult, StoreStats};
pub use remote::{RemoteMatch, RemoteVectorIndex, VectorUpsert};
pub use similarity::cosine_similarity;

#[cfg(test)]
pub use remote::MockRemoteVectorIndex;

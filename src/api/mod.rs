//! Read-only ops HTTP surface

pub mod health;
pub mod rag;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;

//! Infrastructure layer - chunkers, embedders, stores, loaders and services

pub mod embedding;
pub mod http;
pub mod ingestion;
pub mod knowledge_base;
pub mod logging;
pub mod services;
pub mod vector_store;

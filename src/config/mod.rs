//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, ChunkingSettings, EmbeddingSettings, KnowledgeBaseSettings,
    LogFormat, LoggingConfig, RemoteIndexSettings, RetrievalSettings, ServerConfig,
};

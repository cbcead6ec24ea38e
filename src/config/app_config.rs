use serde::Deserialize;

use crate::domain::ingestion::{ChunkingConfig, ChunkingType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub knowledge_base: KnowledgeBaseSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub remote_index: RemoteIndexSettings,
    pub cache: CacheConfig,
    pub retrieval: RetrievalSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseSettings {
    pub path: String,
    /// Append the built-in process, documents and refusal guides
    pub include_supplementary: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// `paragraphs`, `sentences` or `fixed`
    pub strategy: String,
    pub chunk_size: usize,
    pub overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteIndexSettings {
    pub api_key: Option<String>,
    pub index_name: String,
    pub controller_url: String,
    pub timeout_secs: u64,
    pub upsert_batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub default_top_k: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for KnowledgeBaseSettings {
    fn default() -> Self {
        Self {
            path: "data/visa_kb.json".to_string(),
            include_supplementary: true,
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            strategy: "paragraphs".to_string(),
            chunk_size: 500,
            overlap: 100,
        }
    }
}

impl ChunkingSettings {
    pub fn chunking_type(&self) -> ChunkingType {
        ChunkingType::parse_or_default(&self.strategy)
    }

    pub fn config(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.overlap)
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            batch_size: 10,
            timeout_secs: 30,
        }
    }
}

impl Default for RemoteIndexSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: "visabuddy-visa-kb".to_string(),
            controller_url: "https://api.pinecone.io".to_string(),
            timeout_secs: 10,
            upsert_batch_size: 100,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: ".cache/rag_cache.json".to_string(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { default_top_k: 5 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(app_config)
    }

    /// Fill credentials left unset from the provider's conventional variables
    pub fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.embedding.api_key.is_none() {
            self.embedding.api_key = lookup("OPENAI_API_KEY");
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            if self.embedding.base_url == EmbeddingSettings::default().base_url {
                self.embedding.base_url = base_url;
            }
        }
        if self.remote_index.api_key.is_none() {
            self.remote_index.api_key = lookup("PINECONE_API_KEY");
        }
        if let Some(index_name) = lookup("PINECONE_INDEX_NAME") {
            if self.remote_index.index_name == RemoteIndexSettings::default().index_name {
                self.remote_index.index_name = index_name;
            }
        }
    }
}

//! CLI for the VisaBuddy RAG engine
//!
//! - `serve`: initialize the pipeline and run the ops HTTP API
//! - `ingest`: rebuild the vector stores and print the validation report
//! - `search`: run one retrieval query
//! - `validate`: print the validation report as JSON
//! - `clear-cache`: delete the local vector cache

pub mod clear_cache;
pub mod ingest;
pub mod search;
pub mod serve;
pub mod validate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// VisaBuddy RAG - visa knowledge retrieval engine
#[derive(Parser)]
#[command(name = "visabuddy-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize the pipeline and serve the ops API
    Serve,

    /// Load, chunk, embed and index the knowledge base
    Ingest,

    /// Retrieve context for a query
    Search(search::SearchArgs),

    /// Run the retrieval validation suite
    Validate,

    /// Delete the local vector cache
    ClearCache,
}

/// Load `.env` and configuration, then install logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration, using defaults: {}", e);
            let mut config = AppConfig::default();
            config.apply_env_fallbacks(|key| std::env::var(key).ok());
            config
        }
    };

    logging::init_logging(&config.logging);
    config
}

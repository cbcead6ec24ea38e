//! Ingest command - rebuilds both vector stores

use std::sync::Arc;

use tracing::info;

use crate::infrastructure::services::RetrievalValidator;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let orchestrator = Arc::new(crate::build_orchestrator(&config)?);
    if !orchestrator.initialize().await {
        anyhow::bail!("Failed to initialize RAG pipeline from {}", config.knowledge_base.path);
    }

    let status = orchestrator.status().await;
    info!(
        documents = status.documents_indexed,
        remote = status.remote_available,
        cache = status.cache_populated,
        embedder = %status.embedder,
        "Ingestion complete"
    );

    let report = RetrievalValidator::new(orchestrator).validate_system().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

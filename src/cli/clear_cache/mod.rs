//! Clear-cache command

use tracing::info;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let orchestrator = crate::build_orchestrator(&config)?;
    let removed = orchestrator.status().await.cache_stats.total_documents;
    orchestrator.clear_cache().await?;

    info!(path = %config.cache.path, removed, "Local vector cache cleared");
    Ok(())
}

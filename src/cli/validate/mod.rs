//! Validate command - JSON system report on stdout

use std::sync::Arc;

use crate::domain::validation::OverallStatus;
use crate::infrastructure::services::RetrievalValidator;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let orchestrator = Arc::new(crate::build_orchestrator(&config)?);
    if !orchestrator.initialize().await {
        anyhow::bail!("Failed to initialize RAG pipeline from {}", config.knowledge_base.path);
    }

    let report = RetrievalValidator::new(orchestrator).validate_system().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.overall_status == OverallStatus::NeedsImprovement {
        tracing::warn!(
            pass_rate = report.validation_suite.pass_rate,
            "Retrieval quality below threshold"
        );
    }

    Ok(())
}

//! Search command - one retrieval query printed as JSON

use clap::Args;

use crate::domain::retrieval::RetrievalQuery;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Question to retrieve context for
    pub query: String,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub visa_type: Option<String>,

    /// Defaults to `retrieval.default_top_k`
    #[arg(long)]
    pub top_k: Option<usize>,
}

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let orchestrator = crate::build_orchestrator(&config)?;
    if !orchestrator.initialize().await {
        anyhow::bail!("Failed to initialize RAG pipeline from {}", config.knowledge_base.path);
    }

    let mut query = RetrievalQuery::new(args.query)
        .with_top_k(args.top_k.unwrap_or(config.retrieval.default_top_k));
    if let Some(country) = args.country {
        query = query.with_country(country);
    }
    if let Some(visa_type) = args.visa_type {
        query = query.with_visa_type(visa_type);
    }

    let context = orchestrator.retrieve(query).await;
    println!("{}", serde_json::to_string_pretty(&context)?);

    Ok(())
}

use clap::Parser;
use visabuddy_rag::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Ingest => cli::ingest::run().await,
        Command::Search(args) => cli::search::run(args).await,
        Command::Validate => cli::validate::run().await,
        Command::ClearCache => cli::clear_cache::run().await,
    }
}

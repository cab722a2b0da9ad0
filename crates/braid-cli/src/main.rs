use anyhow::Result;
use clap::Parser;

use braid_core::BraidConfig;

mod cli;
mod commands;

use cli::{parse_depth, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("braid={log_level}")));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = BraidConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { path, json } => commands::parse(&path, json),
        Commands::Ingest { files } => commands::ingest(&config, &files).await,
        Commands::Query {
            question,
            corpus,
            strategy,
            policy,
            depth,
            topk,
            show_context,
        } => {
            let depth = depth.map(parse_depth).transpose()?;
            commands::query(
                &config,
                &question,
                &corpus,
                strategy.map(Into::into),
                policy.map(Into::into),
                depth,
                topk,
                show_context,
            )
            .await
        }
    }
}

//! rolo CLI - keep a local contact book in sync with iCloud contacts

mod cli;
mod commands;
mod config;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::Context;
use crate::commands::completions::run_completions;
use crate::commands::export::run_export_vault;
use crate::commands::pull::run_pull;
use crate::commands::sync_groups::run_sync_groups;
use crate::commands::tags::run_tags;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rolo=info".parse().unwrap())
                .add_directive("rolo_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let context = || {
        Context::resolve(
            cli.config.as_deref(),
            cli.data_dir.as_deref(),
            cli.cache.as_deref(),
        )
    };

    match &cli.command {
        Commands::Pull { cached } => run_pull(&context()?, *cached).await?,
        Commands::SyncGroups => run_sync_groups(&context()?).await?,
        Commands::ExportVault { vault } => run_export_vault(&context()?, vault.as_deref())?,
        Commands::Tags { json } => run_tags(&context()?, *json)?,
        Commands::Completions { shell, output } => run_completions(*shell, output.as_deref())?,
    }

    Ok(())
}

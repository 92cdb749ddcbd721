//! FileShare Hub CLI - an interactive shell over your Supabase file folder
//!
//! Sign in, upload, browse, preview and delete files from the terminal.

mod cli;
mod commands;
mod error;
mod shell;


use std::io;

use clap::Parser;
use fileshare_core::config::SupabaseConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;
use crate::shell::Shell;

const DEFAULT_LOG_FILTER: &str = "fileshare=info";

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
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tracing::debug!(url = %config.url, bucket = %config.bucket, "Using Supabase project");

    let auth = config
        .auth_client()
        .map_err(|error| CliError::Config(error.to_string()))?;
    let storage = config
        .storage_client()
        .map_err(|error| CliError::Config(error.to_string()))?;

    Shell::new(auth, storage).run().await
}

fn load_config(cli: &Cli) -> Result<SupabaseConfig, CliError> {
    SupabaseConfig::with_overrides(
        cli.supabase_url.as_deref(),
        cli.supabase_key.as_deref(),
        cli.bucket.as_deref(),
    )
    .map_err(|error| CliError::Config(error.to_string()))?
    .ok_or(CliError::NotConfigured)
}

//! Clubtally CLI - track members, payments, and expenses from the terminal
//!
//! Works fully offline; run `clubtally sync` or `clubtally watch` to
//! reconcile with the remote store when one is configured.

mod cli;
mod commands;
mod error;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clubtally_core::db::Database;

use crate::cli::{Cli, Commands};
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
                .add_directive("clubtally=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Arc::new(Database::open(&db_path)?);

    match cli.command {
        Commands::Member(command) => commands::members::run(&db, command)?,
        Commands::Payment(command) => commands::payments::run(&db, command)?,
        Commands::Expense(command) => commands::expenses::run(&db, command)?,
        Commands::Session(command) => commands::sessions::run(&db, command)?,
        Commands::Sync {
            push_only,
            pull_only,
        } => commands::sync::run_sync(db, push_only, pull_only).await?,
        Commands::Status => commands::sync::run_status(&db)?,
        Commands::Watch { interval_secs } => commands::sync::run_watch(db, interval_secs).await?,
    }

    Ok(())
}

fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("CLUBTALLY_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clubtally")
        .join("clubtally.db")
}

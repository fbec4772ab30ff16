use std::sync::Arc;
use std::time::Duration;

use clubtally_core::config::RemoteConfig;
use clubtally_core::db::Database;
use clubtally_core::remote::HttpRemoteStore;
use clubtally_core::sync::{ConnectivityGate, SyncEngine, SyncResult, SyncScheduler, SYNC_TABLES};

use crate::error::CliError;

fn build_engine(db: Arc<Database>) -> Result<SyncEngine<HttpRemoteStore>, CliError> {
    let config = RemoteConfig::from_env()?;
    let Some(remote) = HttpRemoteStore::from_config(&config)? else {
        return Err(CliError::SyncNotConfigured);
    };
    let gate = ConnectivityGate::new(config.probe_ttl);
    Ok(SyncEngine::new(db, remote, gate))
}

fn print_result(result: &SyncResult) {
    println!(
        "Sync {}: pushed {}, pulled {}, {} table(s)",
        if result.success { "ok" } else { "failed" },
        result.records_pushed,
        result.records_pulled,
        result.tables_processed.len()
    );
    for error in &result.errors {
        eprintln!("  {error}");
    }
}

pub async fn run_sync(
    db: Arc<Database>,
    push_only: bool,
    pull_only: bool,
) -> Result<(), CliError> {
    let engine = build_engine(db)?;
    let result = if push_only {
        engine.push_changes().await
    } else if pull_only {
        engine.pull_changes().await
    } else {
        engine.sync_all().await
    };
    print_result(&result);
    if result.success {
        Ok(())
    } else {
        Err(CliError::SyncFailed(result.errors.len()))
    }
}

pub fn run_status(db: &Database) -> Result<(), CliError> {
    let config = RemoteConfig::from_env()?;
    if config.is_configured() {
        let url = config.base_url.as_deref().unwrap_or_default();
        println!("Remote: {url}");
        println!("Interval: {}s", config.sync_interval.as_secs());
    } else {
        println!("Remote: not configured");
    }

    let conn = db.conn()?;
    let mut total = 0u64;
    for table in SYNC_TABLES {
        let pending: u64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE sync_status = 'pending'"),
                [],
                |row| row.get(0),
            )
            .map_err(clubtally_core::Error::from)?;
        total += pending;
        println!("  {table:<15} {pending} pending");
    }
    println!("Total pending: {total}");
    Ok(())
}

pub async fn run_watch(db: Arc<Database>, interval_secs: Option<u64>) -> Result<(), CliError> {
    let mut config = RemoteConfig::from_env()?;
    if let Some(secs) = interval_secs {
        config = config.with_sync_interval(Duration::from_secs(secs));
    }
    let Some(remote) = HttpRemoteStore::from_config(&config)? else {
        return Err(CliError::SyncNotConfigured);
    };
    let gate = ConnectivityGate::new(config.probe_ttl);
    let engine = Arc::new(SyncEngine::new(db, remote, gate));
    engine.on_sync_complete(Box::new(|result| {
        tracing::info!(
            success = result.success,
            pushed = result.records_pushed,
            pulled = result.records_pulled,
            errors = result.errors.len(),
            "sync pass finished"
        );
    }));

    let scheduler = SyncScheduler::new(engine, config.sync_interval);
    scheduler.start();
    println!(
        "Syncing every {}s; press Ctrl-C to stop",
        config.sync_interval.as_secs()
    );

    tokio::signal::ctrl_c().await?;
    scheduler.stop();
    println!("Stopped.");
    Ok(())
}

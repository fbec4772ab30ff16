//! Periodic sync scheduling.
//!
//! Runs one pass shortly after startup, then on a fixed interval, as a
//! cancellable task with an explicit start/stop lifecycle. Manual triggers
//! go through the same engine and therefore the same single-flight guard,
//! so periodic and manual passes never overlap.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::remote::RemoteStore;
use crate::sync::engine::{ListenerId, SyncEngine, SyncListener, SyncResult};

const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(2);

/// Owns the recurring sync task and re-exposes the engine's entry points.
pub struct SyncScheduler<R: RemoteStore + 'static> {
    engine: Arc<SyncEngine<R>>,
    interval: Duration,
    startup_delay: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<R: RemoteStore + 'static> SyncScheduler<R> {
    /// Create a scheduler running a pass every `interval`.
    pub fn new(engine: Arc<SyncEngine<R>>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            startup_delay: DEFAULT_STARTUP_DELAY,
            task: Mutex::new(None),
        }
    }

    /// Override the delay before the initial pass.
    #[must_use]
    pub const fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Start the recurring task. A second call while running is a no-op.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self) {
        let Ok(mut task) = self.task.lock() else {
            return;
        };
        if task.is_some() {
            return;
        }

        let engine = Arc::clone(&self.engine);
        let startup_delay = self.startup_delay;
        let interval = self.interval;
        tracing::debug!(?interval, "starting sync scheduler");

        *task = Some(tokio::spawn(async move {
            tokio::time::sleep(startup_delay).await;
            loop {
                engine.sync_all().await;
                tokio::time::sleep(interval).await;
            }
        }));
    }

    /// Cancel the recurring task. In-flight passes are not interrupted
    /// mid-table; the next tick simply never fires.
    pub fn stop(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
                tracing::debug!("sync scheduler stopped");
            }
        }
    }

    /// Whether the recurring task is active.
    pub fn is_running(&self) -> bool {
        self.task.lock().map_or(false, |task| task.is_some())
    }

    /// Run a full pass now, sharing the engine's single-flight guard.
    pub async fn trigger_sync(&self) -> SyncResult {
        self.engine.sync_all().await
    }

    /// Push-only entry point for the front end.
    pub async fn push_changes(&self) -> SyncResult {
        self.engine.push_changes().await
    }

    /// Pull-only entry point for the front end.
    pub async fn pull_changes(&self) -> SyncResult {
        self.engine.pull_changes().await
    }

    /// Whether a pass is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.engine.is_syncing()
    }

    /// The most recent pass result.
    pub fn last_sync_result(&self) -> Option<SyncResult> {
        self.engine.last_result()
    }

    /// Register a completion listener on the underlying engine.
    pub fn on_sync_complete(&self, listener: SyncListener) -> ListenerId {
        self.engine.on_sync_complete(listener)
    }

    /// Remove a completion listener.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.engine.unsubscribe(id)
    }
}

impl<R: RemoteStore + 'static> Drop for SyncScheduler<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::{Error, Result};
    use crate::sync::connectivity::ConnectivityGate;
    use crate::sync::rows::RowData;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct CountingRemote {
        pings: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RemoteStore for CountingRemote {
        async fn ping(&self) -> Result<()> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            Err(Error::Remote("unreachable".to_string()))
        }

        async fn fetch_since(&self, _table: &str, _watermark: Option<&str>) -> Result<Vec<RowData>> {
            Ok(Vec::new())
        }

        async fn upsert(&self, _table: &str, _row: &RowData) -> Result<()> {
            Ok(())
        }
    }

    fn scheduler_with(remote: CountingRemote, interval: Duration) -> SyncScheduler<CountingRemote> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let engine = Arc::new(SyncEngine::new(
            db,
            remote,
            ConnectivityGate::new(Duration::ZERO),
        ));
        SyncScheduler::new(engine, interval).with_startup_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn start_runs_initial_pass_and_stop_cancels() {
        let remote = CountingRemote::default();
        let scheduler = scheduler_with(remote.clone(), Duration::from_secs(600));

        scheduler.start();
        assert!(scheduler.is_running());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(remote.pings.load(Ordering::SeqCst), 1);

        scheduler.stop();
        assert!(!scheduler.is_running());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(remote.pings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_twice_spawns_one_task() {
        let remote = CountingRemote::default();
        let scheduler = scheduler_with(remote.clone(), Duration::from_secs(600));

        scheduler.start();
        scheduler.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(remote.pings.load(Ordering::SeqCst), 1);
        scheduler.stop();
    }

    #[tokio::test]
    async fn manual_trigger_records_a_result() {
        let remote = CountingRemote::default();
        let scheduler = scheduler_with(remote, Duration::from_secs(600));

        let result = scheduler.trigger_sync().await;
        assert!(result.success); // offline is a successful no-op
        assert!(!scheduler.is_syncing());
        assert_eq!(scheduler.last_sync_result(), Some(result));
    }
}

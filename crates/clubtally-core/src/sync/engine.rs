//! Bidirectional sync engine.
//!
//! One pass pushes locally pending rows table by table, then pulls remote
//! rows past each table's watermark. Conflicts resolve whole-row by
//! last-write-wins on `updated_at`; ties favor local state. Offline is
//! expected steady state, never an error.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{Database, MetaRepository, SqliteMetaRepository};
use crate::error::Result;
use crate::remote::RemoteStore;
use crate::sync::connectivity::ConnectivityGate;
use crate::sync::rows::{self, AppliedChange};
use crate::util::{now_rfc3339, parse_timestamp};

/// Tables in sync order.
///
/// Parents come before children so a pull inside one pass never references
/// a row that has not landed yet (subscriptions after members and packages,
/// payments after subscriptions).
pub const SYNC_TABLES: &[&str] = &[
    "members",
    "packages",
    "subscriptions",
    "payments",
    "expenses",
    "class_sessions",
];

/// Summary of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Whether every table completed without errors
    pub success: bool,
    /// Tables visited by this pass
    pub tables_processed: Vec<String>,
    /// Rows acknowledged by the remote store
    pub records_pushed: usize,
    /// Remote rows inserted or applied locally
    pub records_pulled: usize,
    /// Row- and table-level failures, tagged with table and id
    pub errors: Vec<String>,
    /// Completion time (RFC 3339)
    pub timestamp: String,
}

impl SyncResult {
    /// A successful pass that did no work (offline, or nothing to do).
    fn no_op() -> Self {
        Self {
            success: true,
            tables_processed: Vec::new(),
            records_pushed: 0,
            records_pulled: 0,
            errors: Vec::new(),
            timestamp: now_rfc3339(),
        }
    }
}

/// Handle returned by `on_sync_complete`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Callback invoked after every finished pass.
pub type SyncListener = Box<dyn Fn(&SyncResult) + Send + Sync>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PassMode {
    Full,
    PushOnly,
    PullOnly,
}

/// Orchestrates bidirectional reconciliation between the local store and
/// the remote backend. At most one pass runs at a time regardless of
/// trigger source.
pub struct SyncEngine<R> {
    db: Arc<Database>,
    remote: R,
    gate: ConnectivityGate,
    flight: tokio::sync::Mutex<()>,
    syncing: AtomicBool,
    last_result: Mutex<Option<SyncResult>>,
    listeners: Mutex<Vec<(u64, SyncListener)>>,
    next_listener: AtomicU64,
}

/// Clears the public "syncing" flag even if a pass unwinds early.
struct SyncingFlag<'a>(&'a AtomicBool);

impl Drop for SyncingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<R: RemoteStore> SyncEngine<R> {
    /// Create an engine over the given store, remote client, and gate.
    pub fn new(db: Arc<Database>, remote: R, gate: ConnectivityGate) -> Self {
        Self {
            db,
            remote,
            gate,
            flight: tokio::sync::Mutex::new(()),
            syncing: AtomicBool::new(false),
            last_result: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// The local store this engine reconciles.
    pub const fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Full bidirectional sync: push, then pull, over all tables.
    pub async fn sync_all(&self) -> SyncResult {
        self.run_guarded(PassMode::Full).await
    }

    /// Push locally pending rows only.
    pub async fn push_changes(&self) -> SyncResult {
        self.run_guarded(PassMode::PushOnly).await
    }

    /// Pull remote changes only.
    pub async fn pull_changes(&self) -> SyncResult {
        self.run_guarded(PassMode::PullOnly).await
    }

    /// Whether a pass is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// The most recent pass result, if any pass has finished.
    pub fn last_result(&self) -> Option<SyncResult> {
        self.last_result.lock().ok().and_then(|last| last.clone())
    }

    /// Register a listener invoked after every finished pass.
    pub fn on_sync_complete(&self, listener: SyncListener) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, listener));
        }
        ListenerId(id)
    }

    /// Remove a previously registered listener. Returns whether it existed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.lock().map_or(false, |mut listeners| {
            let before = listeners.len();
            listeners.retain(|(listener_id, _)| *listener_id != id.0);
            listeners.len() != before
        })
    }

    /// Single-flight guard shared by all entry points: the caller that wins
    /// the guard runs a pass; a caller arriving mid-pass waits it out and
    /// reports that pass's outcome instead of starting a second one.
    async fn run_guarded(&self, mode: PassMode) -> SyncResult {
        if let Ok(_guard) = self.flight.try_lock() {
            self.syncing.store(true, Ordering::SeqCst);
            let flag = SyncingFlag(&self.syncing);
            let result = self.run_pass(mode).await;
            drop(flag);

            if let Ok(mut last) = self.last_result.lock() {
                *last = Some(result.clone());
            }
            self.notify(&result);
            result
        } else {
            let _guard = self.flight.lock().await;
            self.last_result().unwrap_or_else(SyncResult::no_op)
        }
    }

    async fn run_pass(&self, mode: PassMode) -> SyncResult {
        if !self.gate.is_online(&self.remote).await {
            tracing::debug!("offline, skipping sync pass");
            return SyncResult::no_op();
        }

        let mut records_pushed = 0;
        let mut records_pulled = 0;
        let mut errors = Vec::new();

        if mode != PassMode::PullOnly {
            for table in SYNC_TABLES {
                match self.push_table(table).await {
                    Ok((count, mut table_errors)) => {
                        records_pushed += count;
                        errors.append(&mut table_errors);
                    }
                    Err(error) => {
                        tracing::warn!(table, %error, "push failed");
                        errors.push(format!("{table}: push failed: {error}"));
                    }
                }
            }
        }

        if mode != PassMode::PushOnly {
            for table in SYNC_TABLES {
                match self.pull_table(table).await {
                    Ok((count, mut table_errors)) => {
                        records_pulled += count;
                        errors.append(&mut table_errors);
                    }
                    Err(error) => {
                        tracing::warn!(table, %error, "pull failed");
                        errors.push(format!("{table}: pull failed: {error}"));
                    }
                }
            }
        }

        let result = SyncResult {
            success: errors.is_empty(),
            tables_processed: SYNC_TABLES.iter().map(ToString::to_string).collect(),
            records_pushed,
            records_pulled,
            errors,
            timestamp: now_rfc3339(),
        };
        tracing::info!(
            pushed = result.records_pushed,
            pulled = result.records_pulled,
            errors = result.errors.len(),
            "sync pass complete"
        );
        result
    }

    /// Push one table's pending rows. Row-level failures are collected and
    /// the remaining rows still go out; the rows stay pending for the next
    /// pass.
    async fn push_table(&self, table: &str) -> Result<(usize, Vec<String>)> {
        let pending = {
            let conn = self.db.conn()?;
            rows::pending_rows(&conn, table)?
        };
        if pending.is_empty() {
            return Ok((0, Vec::new()));
        }
        tracing::debug!(table, count = pending.len(), "pushing pending rows");

        let mut pushed = 0;
        let mut errors = Vec::new();
        for row in pending {
            let (id, pushed_stamp) = match (rows::row_id(&row), rows::row_updated_at(&row)) {
                (Ok(id), Ok(stamp)) => (id, stamp.to_string()),
                (Err(error), _) | (_, Err(error)) => {
                    errors.push(format!("{table}: {error}"));
                    continue;
                }
            };

            match self.remote.upsert(table, &row).await {
                Ok(()) => {
                    let conn = self.db.conn()?;
                    rows::mark_row_synced(&conn, table, id, &pushed_stamp)?;
                    pushed += 1;
                }
                Err(error) => {
                    errors.push(format!("{table}[{id}]: {error}"));
                }
            }
        }

        Ok((pushed, errors))
    }

    /// Pull one table's remote changes past the stored watermark and apply
    /// them. The watermark advances to the newest remote `updated_at` seen,
    /// and only when every fetched row applied cleanly.
    async fn pull_table(&self, table: &str) -> Result<(usize, Vec<String>)> {
        let watermark = {
            let conn = self.db.conn()?;
            SqliteMetaRepository::new(&conn).watermark(table)?
        };

        let remote_rows = self.remote.fetch_since(table, watermark.as_deref()).await?;
        if remote_rows.is_empty() {
            return Ok((0, Vec::new()));
        }
        tracing::debug!(table, count = remote_rows.len(), "applying remote rows");

        let mut pulled = 0;
        let mut errors = Vec::new();
        let mut max_seen: Option<(DateTime<Utc>, String)> = match &watermark {
            Some(stamp) => Some((parse_timestamp(stamp)?, stamp.clone())),
            None => None,
        };

        let conn = self.db.conn()?;
        for row in &remote_rows {
            match rows::apply_remote_row(&conn, table, row) {
                Ok(change) => {
                    if change != AppliedChange::Skipped {
                        pulled += 1;
                    }
                    if let Ok(stamp) = rows::row_updated_at(row) {
                        if let Ok(parsed) = parse_timestamp(stamp) {
                            let newer = max_seen.as_ref().map_or(true, |(max, _)| parsed > *max);
                            if newer {
                                max_seen = Some((parsed, stamp.to_string()));
                            }
                        }
                    }
                }
                Err(error) => {
                    let id = rows::row_id(row).map_or_else(|_| "?".to_string(), |id| id.to_string());
                    errors.push(format!("{table}[{id}]: {error}"));
                }
            }
        }

        if errors.is_empty() {
            if let Some((_, stamp)) = max_seen {
                if watermark.as_deref() != Some(stamp.as_str()) {
                    SqliteMetaRepository::new(&conn).set_watermark(table, &stamp)?;
                }
            }
        }

        Ok((pulled, errors))
    }

    fn notify(&self, result: &SyncResult) {
        if let Ok(listeners) = self.listeners.lock() {
            for (_, listener) in listeners.iter() {
                listener(result);
            }
        }
    }
}

//! Remote store client: row-level CRUD against the backend over HTTP.

mod http;

pub use http::HttpRemoteStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::sync::rows::RowData;

/// Row-level operations the sync engine needs from the remote backend.
///
/// Implementations must make `upsert` idempotent by row id: a row may be
/// re-pushed after a prior attempt's ambiguous outcome.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lightweight reachability probe.
    async fn ping(&self) -> Result<()>;

    /// Fetch rows of `table` with `updated_at` strictly greater than the
    /// watermark; `None` fetches everything.
    async fn fetch_since(&self, table: &str, watermark: Option<&str>) -> Result<Vec<RowData>>;

    /// Insert or overwrite a row by its `id`.
    async fn upsert(&self, table: &str, row: &RowData) -> Result<()>;
}

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] clubtally_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(
        "Sync is not configured. Set CLUBTALLY_SYNC_URL and CLUBTALLY_API_KEY to enable it."
    )]
    SyncNotConfigured,
    #[error("Sync finished with {0} error(s)")]
    SyncFailed(usize),
}

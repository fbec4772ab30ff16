//! Package model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A billable membership package (e.g. "monthly unlimited").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    /// Price in the smallest currency unit
    pub price_cents: i64,
    pub duration_days: i64,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub sync_status: SyncStatus,
    pub deleted_at: Option<String>,
}

/// Input for creating a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPackage {
    pub name: String,
    pub price_cents: i64,
    pub duration_days: i64,
    pub description: Option<String>,
}

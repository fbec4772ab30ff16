//! Subscription model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A member's enrollment in a package over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub member_id: i64,
    pub package_id: i64,
    pub starts_on: String,
    pub ends_on: String,
    /// Free-form lifecycle status, e.g. "active" or "expired"
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub sync_status: SyncStatus,
    pub deleted_at: Option<String>,
}

/// Input for creating a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubscription {
    pub member_id: i64,
    pub package_id: i64,
    pub starts_on: String,
    pub ends_on: String,
    pub status: String,
}

//! Class session model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A scheduled class on the club calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: i64,
    pub title: String,
    pub coach: Option<String>,
    /// Scheduled start (RFC 3339)
    pub scheduled_at: String,
    pub capacity: i64,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub sync_status: SyncStatus,
    pub deleted_at: Option<String>,
}

/// Input for scheduling a class session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClassSession {
    pub title: String,
    pub coach: Option<String>,
    pub scheduled_at: String,
    pub capacity: i64,
    pub note: Option<String>,
}

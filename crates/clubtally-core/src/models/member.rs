//! Member model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A club member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Locally assigned identity, stable across stores
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Date the member joined (ISO date string)
    pub joined_on: String,
    pub notes: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last mutation timestamp (RFC 3339), rewritten by the store
    pub updated_at: String,
    pub sync_status: SyncStatus,
    /// Soft-delete marker; non-null means deleted
    pub deleted_at: Option<String>,
}

impl Member {
    /// Whether the member is soft-deleted.
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input for creating a member; identity and bookkeeping columns are
/// assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub joined_on: String,
    pub notes: Option<String>,
}

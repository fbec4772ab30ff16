//! Domain models shared by the repositories, sync engine, and front ends.

mod class_session;
mod expense;
mod member;
mod package;
mod payment;
mod subscription;

pub use class_session::{ClassSession, NewClassSession};
pub use expense::{Expense, NewExpense};
pub use member::{Member, NewMember};
pub use package::{NewPackage, Package};
pub use payment::{NewPayment, Payment};
pub use subscription::{NewSubscription, Subscription};

use serde::{Deserialize, Serialize};

/// Whether a row's latest local state has been acknowledged by the remote store.
///
/// Every repository mutation flips a row back to `Pending`; only the sync
/// engine moves it to `Synced`, as the terminal step of a successful push or
/// a pull application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
}

impl SyncStatus {
    /// Database representation of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
        }
    }

    /// Parse a database value; anything unknown is treated as `Pending` so a
    /// corrupted status is re-pushed rather than silently trusted.
    pub fn parse(value: &str) -> Self {
        match value {
            "synced" => Self::Synced,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_status_roundtrip() {
        assert_eq!(SyncStatus::parse("synced"), SyncStatus::Synced);
        assert_eq!(SyncStatus::parse("pending"), SyncStatus::Pending);
        assert_eq!(SyncStatus::parse("garbage"), SyncStatus::Pending);
        assert_eq!(SyncStatus::Synced.as_str(), "synced");
    }
}

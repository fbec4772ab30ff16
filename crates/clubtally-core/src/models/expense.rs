//! Expense model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A business expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: String,
    pub amount_cents: i64,
    pub spent_on: String,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub sync_status: SyncStatus,
    pub deleted_at: Option<String>,
}

/// Input for recording an expense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewExpense {
    pub category: String,
    pub amount_cents: i64,
    pub spent_on: String,
    pub note: Option<String>,
}

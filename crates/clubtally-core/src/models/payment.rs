//! Payment model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A payment received from a member, optionally tied to a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub member_id: i64,
    pub subscription_id: Option<i64>,
    pub amount_cents: i64,
    /// Payment method, e.g. "cash" or "card"
    pub method: String,
    pub paid_on: String,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub sync_status: SyncStatus,
    pub deleted_at: Option<String>,
}

/// Input for recording a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPayment {
    pub member_id: i64,
    pub subscription_id: Option<i64>,
    pub amount_cents: i64,
    pub method: String,
    pub paid_on: String,
    pub note: Option<String>,
}

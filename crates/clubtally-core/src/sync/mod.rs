//! Bidirectional sync between the local store and the remote backend.
//!
//! Conflict resolution is deliberately coarse: whole rows, last-write-wins
//! on `updated_at`, no field-level merge.

mod connectivity;
mod engine;
pub mod rows;
mod scheduler;

pub use connectivity::ConnectivityGate;
pub use engine::{ListenerId, SyncEngine, SyncListener, SyncResult, SYNC_TABLES};
pub use scheduler::SyncScheduler;

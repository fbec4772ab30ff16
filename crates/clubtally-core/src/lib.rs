//! clubtally-core - Core library for clubtally
//!
//! This crate contains the shared models, local store, remote client, and
//! sync engine used by all clubtally interfaces.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod sync;
pub mod util;

pub use error::{Error, Result};

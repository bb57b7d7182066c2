//! Sync and check over an output tree
//!
//! - **sync**: materialize, resolve, pre-clean, copy, then persist the
//!   status record
//! - **check**: the same resolution pipeline, compared against the status
//!   record instead of applied

mod check;
mod context;
mod engine;

pub use check::{CheckReport, CheckStatus};
pub use context::SyncContext;
pub use engine::{MirrorEngine, SyncReport, SyncedRepo};

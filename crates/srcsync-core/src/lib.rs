//! Core mirroring layer for srcsync
//!
//! This crate turns a manifest into an output tree assembled from pieces of
//! remote repositories:
//!
//! - **Cache keys**: stable checkout locations derived from repository URLs
//! - **Manifest**: typed, validated `manifest.yml` contents
//! - **Resolution**: copy directives expanded into concrete file pairs
//! - **Execution**: the pre-clean and copy passes over the output tree
//! - **MirrorEngine**: `sync` and `check`, backed by a persisted status record
//!
//! # Architecture
//!
//! ```text
//!                   srcsync-cli
//!                        |
//!                  srcsync-core
//!                        |
//!              +---------+---------+
//!              |                   |
//!         srcsync-fs          srcsync-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use srcsync_core::{Manifest, MirrorEngine};
//! use srcsync_git::GitMaterializer;
//!
//! fn example() -> srcsync_core::Result<()> {
//!     let manifest = Manifest::load(Path::new("manifest.yml"), None)?;
//!     let engine = MirrorEngine::new("/tmp/srcsync-cache", GitMaterializer::new());
//!     engine.sync(&manifest)?;
//!     assert!(engine.check(&manifest)?.is_up_to_date());
//!     Ok(())
//! }
//! ```

pub mod cache_key;
pub mod config;
pub mod error;
pub mod executor;
pub mod resolve;
pub mod status;
pub mod sync;

pub use cache_key::{CacheKey, derive_cache_key};
pub use config::{CopySpec, DEFAULT_REVISION, Manifest, RepoSpec};
pub use error::{Error, Result};
pub use executor::{CopyExecutor, CopyPlan, PlannedCopy};
pub use resolve::{CopyPair, EntryKind, resolve};
pub use status::StatusRecord;
pub use sync::{CheckReport, CheckStatus, MirrorEngine, SyncContext, SyncReport, SyncedRepo};

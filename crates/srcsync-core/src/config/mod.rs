//! Manifest loading and validation
//!
//! The manifest is YAML:
//!
//! ```yaml
//! output_dir: ./vendor
//! repos:
//!   - url: https://github.com/org/repo.git
//!     version: v0.2
//!     copy:
//!       - src: roles/*
//!         dst: roles/
//! ```
//!
//! Parsing goes through loosely typed serde structs first, then a single
//! validation pass produces the typed [`Manifest`] tree. Nothing downstream
//! re-checks required fields.

mod manifest;

pub use manifest::{CopySpec, DEFAULT_REVISION, Manifest, RepoSpec};

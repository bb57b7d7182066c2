//! Shared test utilities for the srcsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`]: upstream git repositories built with `git2`
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace) holding an
//!   output directory, a cache directory and a manifest

pub mod git;
pub mod workspace;

//! Git collaborator for srcsync
//!
//! Brings a local cache directory to a requested revision of a remote
//! repository and reports the commit it landed on.

pub mod error;
pub mod helpers;
pub mod materializer;
pub mod provider;

pub use error::{Error, Result};
pub use materializer::GitMaterializer;
pub use provider::{CommitId, Materializer};

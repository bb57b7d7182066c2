//! Filesystem primitives for srcsync
//!
//! Provides lexical path handling, atomic locked writes, checksums and the
//! tree copy/clean operations used when assembling an output tree.

pub mod checksum;
pub mod constants;
pub mod copy;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::compute_checksum;
pub use constants::MirrorPath;
pub use error::{Error, Result};
pub use path::{NormalizedPath, clean_relative};

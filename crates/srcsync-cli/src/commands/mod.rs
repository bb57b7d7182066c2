//! Command implementations for srcsync-cli

pub mod check;
pub mod sync;

pub use check::{EXIT_ERROR, exit_code, run_check};
pub use sync::run_sync;

use std::path::PathBuf;

use srcsync_core::{Manifest, MirrorEngine};
use srcsync_fs::MirrorPath;
use srcsync_git::GitMaterializer;

use crate::cli::TargetArgs;
use crate::error::{CliError, Result};

/// Cache directory from the flag or environment, else the platform default.
pub fn cache_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::cache_dir()
            .map(|dir| dir.join(MirrorPath::CacheDirName.as_str()))
            .ok_or_else(|| {
                CliError::user(
                    "No platform cache directory; pass --cache-dir or set SRCSYNC_CACHE_DIR",
                )
            }),
    }
}

/// Load the manifest and build the engine for one invocation.
fn prepare(args: &TargetArgs) -> Result<(Manifest, MirrorEngine<GitMaterializer>)> {
    let manifest = Manifest::load(&args.manifest, args.output_dir.as_deref())?;
    let cache_dir = cache_dir(args.cache_dir.clone())?;
    tracing::debug!(
        manifest = %args.manifest.display(),
        output = %manifest.output_dir().display(),
        cache = %cache_dir.display(),
        "Prepared invocation"
    );
    let engine = MirrorEngine::new(cache_dir, GitMaterializer::new());
    Ok((manifest, engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_cache_dir_wins() {
        let dir = cache_dir(Some(PathBuf::from("/tmp/explicit"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/explicit"));
    }
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use srcsync_fs::MirrorPath;

/// srcsync - Mirror selected files from remote git repositories
#[derive(Parser, Debug)]
#[command(name = "srcsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch every repository and rebuild the output tree
    ///
    /// Examples:
    ///   srcsync sync                     # Use ./manifest.yml
    ///   srcsync sync -m deps.yml -o out  # Explicit manifest and output
    Sync(TargetArgs),

    /// Report whether the output tree is stale, without modifying it
    ///
    /// Exit codes: 0 up to date, 1 never synced, 2 manifest changed,
    /// 3 upstream content changed, 4 error.
    Check(TargetArgs),
}

/// Arguments shared by `sync` and `check`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TargetArgs {
    /// Path to the manifest
    #[arg(short, long, default_value = MirrorPath::DefaultManifest.as_str())]
    pub manifest: PathBuf,

    /// Output directory, overriding `output_dir` in the manifest
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding repository checkouts
    #[arg(long, env = "SRCSYNC_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

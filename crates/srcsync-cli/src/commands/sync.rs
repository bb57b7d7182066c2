//! Sync command implementation

use colored::Colorize;
use srcsync_git::CommitId;

use super::prepare;
use crate::cli::TargetArgs;
use crate::error::Result;

/// Run the sync command
///
/// Materializes every repository, rebuilds the output tree and writes the
/// status file.
pub fn run_sync(args: &TargetArgs) -> Result<()> {
    let (manifest, engine) = prepare(args)?;

    if !args.json {
        println!(
            "{} Syncing {} repositories into {}",
            "=>".blue().bold(),
            manifest.repos().len(),
            manifest.output_dir().display().to_string().cyan()
        );
    }

    let report = engine.sync(&manifest)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for repo in &report.repos {
        println!(
            "   {} {} @ {} ({})",
            "+".green(),
            repo.label.cyan(),
            repo.revision,
            CommitId::abbreviate(&repo.commit).dimmed()
        );
    }
    println!(
        "{} Copied {} paths. Status written to {}",
        "OK".green().bold(),
        report.copied,
        report.status_file.display()
    );

    Ok(())
}

//! Check command implementation

use colored::Colorize;
use serde::Serialize;
use srcsync_core::{CheckReport, CheckStatus};

use super::prepare;
use crate::cli::TargetArgs;
use crate::error::Result;

/// Exit code for any fatal error
pub const EXIT_ERROR: i32 = 4;

/// Process exit code for a check outcome
pub fn exit_code(status: CheckStatus) -> i32 {
    match status {
        CheckStatus::UpToDate => 0,
        CheckStatus::NoStatusFile => 1,
        CheckStatus::ManifestChanged => 2,
        CheckStatus::ContentChanged => 3,
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    #[serde(flatten)]
    report: &'a CheckReport,
    exit_code: i32,
}

/// Run the check command
///
/// Returns the exit code for the outcome; stale output is not an error.
pub fn run_check(args: &TargetArgs) -> Result<i32> {
    let (manifest, engine) = prepare(args)?;
    let report = engine.check(&manifest)?;
    let code = exit_code(report.status);

    if args.json {
        let output = CheckOutput {
            report: &report,
            exit_code: code,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(code);
    }

    let label = match report.status {
        CheckStatus::UpToDate => "OK".green().bold(),
        CheckStatus::NoStatusFile => "NOT SYNCED".yellow().bold(),
        CheckStatus::ManifestChanged | CheckStatus::ContentChanged => {
            "STALE".red().bold()
        }
    };
    println!("{} {}: {}", label, report.status, report.reason);
    if let Some(path) = &report.path {
        println!("   {} {}", "-".dimmed(), path.display().to_string().cyan());
    }
    if !report.is_up_to_date() {
        println!();
        println!("Run {} to update.", "srcsync sync".cyan());
    }

    Ok(code)
}

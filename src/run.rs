//! Batch loop: identify each file, then copy or move the matched ones.
//!
//! Per-file problems (unreadable container, unsafe target) are logged and
//! counted; only operator console failures and disposition I/O errors stop
//! the run.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::dispose::{dispose, target_path, Disposition};
use crate::identify::{IdentifyError, Identifier};
use crate::models::RunStats;
use crate::probe::DurationProbe;
use crate::safety::{validate_id, validate_target};

/// What happens to matched files.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub disposition: Disposition,
    /// Replace existing targets instead of skipping them
    pub overwrite: bool,
    /// Log dispositions without touching the filesystem
    pub dry_run: bool,
}

/// Copy or move a matched file, logging instead of failing when the target is unsafe.
pub fn place_file(
    source: &Path,
    id: &str,
    options: &RunOptions,
    stats: &mut RunStats,
) -> Result<()> {
    let target = target_path(&options.output_dir, id, source);
    if let Err(e) = validate_id(id).and_then(|_| validate_target(source, &target, options.overwrite)) {
        tracing::warn!(file = %source.display(), "{:#}", e);
        stats.refused_targets += 1;
        return Ok(());
    }

    let verb = match options.disposition {
        Disposition::Copy => "Copying",
        Disposition::Move => "Moving",
    };

    if options.dry_run {
        tracing::info!(dest = %target.display(), "[dry-run] {} {}", verb, source.display());
        return Ok(());
    }

    tracing::info!(dest = %target.display(), "{} {}", verb, source.display());
    dispose(source, &target, options.disposition)?;
    match options.disposition {
        Disposition::Copy => stats.copied += 1,
        Disposition::Move => stats.moved += 1,
    }
    Ok(())
}

/// Identify and dispose of every file in order. Prompts and log lines are
/// emitted with the progress bar suspended.
pub fn run_batch<P, R, W>(
    identifier: &Identifier<'_, P>,
    files: &[PathBuf],
    options: &RunOptions,
    input: &mut R,
    output: &mut W,
    pb: &ProgressBar,
) -> Result<RunStats>
where
    P: DurationProbe,
    R: BufRead,
    W: Write,
{
    let mut stats = RunStats {
        catalog_entries: identifier.catalog().len(),
        dry_run: options.dry_run,
        ..Default::default()
    };

    for path in files {
        stats.files_seen += 1;

        let outcome = pb.suspend(|| identifier.identify(path, input, output));
        let (decision, resolution) = match outcome {
            Ok(result) => result,
            Err(IdentifyError::Probe(e)) => {
                pb.suspend(|| tracing::warn!(file = %path.display(), "Skipping file: {}", e));
                stats.probe_failures += 1;
                pb.inc(1);
                continue;
            }
            Err(e @ IdentifyError::Prompt(_)) => {
                pb.abandon();
                return Err(e).context("Operator interaction failed");
            }
        };
        stats.record_resolution(resolution);

        if let Some(id) = decision.id() {
            pb.suspend(|| place_file(path, id, options, &mut stats))?;
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!("Identified {} files", stats.total_matches()));
    Ok(stats)
}

//! Sync execution: applying the planned copy actions.
//!
//! One failed action never aborts the remaining queue; failures are warned
//! and counted, and partial convergence is a successful run at the process
//! level.

use super::planner::SyncAction;
use super::probe;
use crate::config::RunContext;
use crate::console;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;

/// Success/failure counts for one run of the executor.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ExecStats {
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_copied: u64,
}

/// Apply the plan. Network targets get their host re-probed immediately
/// before each copy; a negative probe skips only that action.
pub fn execute(actions: &[SyncAction], ctx: &RunContext) -> ExecStats {
    let mut stats = ExecStats::default();

    if actions.is_empty() {
        console::status("sync", "all locations already hold the same content");
        return stats;
    }

    if ctx.dry_run {
        for action in actions {
            console::info(format!(
                "dry-run: would copy {} -> {} ({})",
                action.source.display(),
                action.target.display(),
                action.reason.as_str()
            ));
            stats.succeeded += 1;
        }
        return stats;
    }

    let pb = ProgressBar::new(actions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} actions | {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    for action in actions {
        pb.set_message(action.relative_path.clone());

        if let Some(host) = &action.target_host {
            if !probe::host_reachable(host) {
                console::warn(format!(
                    "skipping {}: host {} is not answering",
                    action.target.display(),
                    host
                ));
                stats.failed += 1;
                pb.inc(1);
                continue;
            }
        }

        if let Some(parent) = action.target.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                console::warn(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    err
                ));
                stats.failed += 1;
                pb.inc(1);
                continue;
            }
        }

        match fs::copy(&action.source, &action.target) {
            Ok(bytes) => {
                console::detail(
                    ctx.verbose,
                    format!(
                        "copied {} -> {} ({})",
                        action.source.display(),
                        action.target.display(),
                        action.reason.as_str()
                    ),
                );
                stats.succeeded += 1;
                stats.bytes_copied += bytes;
            }
            Err(err) => {
                console::warn(format!(
                    "copy {} -> {} failed: {}",
                    action.source.display(),
                    action.target.display(),
                    err
                ));
                stats.failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    console::status(
        "sync",
        format!(
            "{} copied, {} failed, {}",
            stats.succeeded,
            stats.failed,
            format_size(stats.bytes_copied, DECIMAL)
        ),
    );

    stats
}

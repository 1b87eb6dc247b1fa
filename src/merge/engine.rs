//! The merge driver: validate, scan, back up, plan, execute, summarize.

use super::backup::{self, BackupStats};
use super::error::SyncError;
use super::executor;
use super::inventory;
use super::location::Location;
use super::planner;
use super::record::FileRecord;
use super::resolver::{ConflictDecider, ConsoleDecider};
use crate::config::RunContext;
use crate::console;
use chrono::{Local, Utc};
use humansize::{format_size, DECIMAL};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Drives one full merge run over the configured locations.
pub struct MergeEngine {
    locations: Vec<Location>,
    archive_root: PathBuf,
    ctx: RunContext,
    decider: Box<dyn ConflictDecider>,
}

/// Everything a launcher hook needs to know about the run.
#[derive(Debug, serde::Serialize)]
pub struct MergeSummary {
    pub started_at: String,
    pub duration_secs: f64,
    pub dry_run: bool,
    pub policy: String,
    pub locations_synced: Vec<String>,
    pub locations_unreachable: Vec<String>,
    pub files_seen: usize,
    pub unique_paths: usize,
    pub conflicts_resolved: usize,
    pub paths_skipped: usize,
    pub actions_planned: usize,
    pub actions_succeeded: usize,
    pub actions_failed: usize,
    pub bytes_copied: u64,
    pub backups: Vec<BackupStats>,
}

impl MergeSummary {
    /// Display the run summary in plain text format
    pub fn display(&self) {
        println!("\n=== Merge Report ===\n");
        println!("Summary:");
        println!("  Locations synced:      {}", self.locations_synced.len());
        println!("  Locations unreachable: {}", self.locations_unreachable.len());
        println!("  Files seen:            {}", self.files_seen);
        println!("  Distinct paths:        {}", self.unique_paths);
        println!("  Conflicts resolved:    {}", self.conflicts_resolved);
        println!("  Paths skipped:         {}", self.paths_skipped);
        println!("  Actions planned:       {}", self.actions_planned);
        println!("  Actions succeeded:     {}", self.actions_succeeded);
        println!("  Actions failed:        {}", self.actions_failed);
        println!("  Bytes copied:          {}", format_size(self.bytes_copied, DECIMAL));
        println!("  Duration:              {:.2}s", self.duration_secs);

        if self.dry_run {
            println!("\nDry run: nothing was written.");
        }

        if !self.locations_unreachable.is_empty() {
            println!("\nUnreachable locations (excluded from this run):");
            for address in &self.locations_unreachable {
                println!("  {}", address);
            }
        }

        if !self.backups.is_empty() {
            println!("\nBackups:");
            for stats in &self.backups {
                println!(
                    "  {} -> {} ({} files, {} failed)",
                    stats.location,
                    stats.backup_dir.display(),
                    stats.files_copied,
                    stats.files_failed
                );
            }
        }

        println!();
    }

    /// Format the run summary as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl MergeEngine {
    pub fn new(addresses: &[String], archive_root: PathBuf, ctx: RunContext) -> Self {
        Self {
            locations: addresses.iter().map(|a| Location::parse(a)).collect(),
            archive_root,
            ctx,
            decider: Box::new(ConsoleDecider),
        }
    }

    /// Replace the manual-conflict decider (tests use a scripted one).
    pub fn with_decider(mut self, decider: Box<dyn ConflictDecider>) -> Self {
        self.decider = decider;
        self
    }

    /// Run the full merge. The plan is computed entirely in memory before
    /// the first mutating copy, so there is no read/write race between the
    /// decide and act phases.
    pub fn run(mut self) -> Result<MergeSummary, SyncError> {
        let start = Instant::now();
        let started_at = Utc::now().to_rfc3339();
        let run_stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();

        // Validate every configured location; unreachable ones are warned
        // and excluded, fatal only if none remain.
        let mut reachable: Vec<Location> = Vec::new();
        let mut unreachable: Vec<String> = Vec::new();
        for mut location in std::mem::take(&mut self.locations) {
            match location.validate(&self.ctx) {
                Ok(()) => {
                    console::detail(
                        self.ctx.verbose,
                        format!("location {} is reachable", location.address),
                    );
                    reachable.push(location);
                }
                Err(err) => {
                    console::warn(format!("skipping {}: {}", location.address, err));
                    unreachable.push(location.address);
                }
            }
        }
        if reachable.is_empty() {
            return Err(SyncError::NoLocationsReachable);
        }

        if !self.ctx.dry_run {
            fs::create_dir_all(&self.archive_root).map_err(|e| {
                SyncError::from_io_error(e, "creating archive directory", Some(self.archive_root.clone()))
            })?;
        }

        // Scan. A failed scan degrades to an empty inventory: the location
        // contributes no files this run but stays a sync target.
        let mut inventories: Vec<BTreeMap<String, FileRecord>> =
            Vec::with_capacity(reachable.len());
        for location in &reachable {
            match inventory::build(location, Some(&self.archive_root)) {
                Ok(files) => {
                    console::status(
                        "scan",
                        format!("{}: {} files", location.address, files.len()),
                    );
                    inventories.push(files);
                }
                Err(err) => {
                    console::warn(format!(
                        "scan of {} failed, treating it as empty for this run: {}",
                        location.address, err
                    ));
                    inventories.push(BTreeMap::new());
                }
            }
        }
        let files_seen: usize = inventories.iter().map(|inv| inv.len()).sum();

        // Snapshot every inventory before anything is mutated. A location
        // whose snapshot fails keeps contributing source files but is never
        // written to this run: no overwrite without a backup behind it.
        let mut backups = Vec::new();
        let mut unprotected: Vec<PathBuf> = Vec::new();
        for (location, files) in reachable.iter().zip(&inventories) {
            match backup::snapshot(files, location, &self.archive_root, &run_stamp, &self.ctx) {
                Ok(stats) => backups.push(stats),
                Err(err) => {
                    console::warn(format!(
                        "backup of {} failed, withholding all writes into it this run: {}",
                        location.address, err
                    ));
                    unprotected.push(location.root.clone());
                }
            }
        }

        let mut plan = planner::plan(
            &mut inventories,
            &reachable,
            self.decider.as_mut(),
            &self.ctx,
        );
        if !unprotected.is_empty() {
            let before = plan.actions.len();
            plan.actions
                .retain(|action| !unprotected.iter().any(|root| action.target.starts_with(root)));
            let withheld = before - plan.actions.len();
            if withheld > 0 {
                console::warn(format!(
                    "withheld {} planned copies into locations with no snapshot",
                    withheld
                ));
            }
        }
        let exec = executor::execute(&plan.actions, &self.ctx);

        Ok(MergeSummary {
            started_at,
            duration_secs: start.elapsed().as_secs_f64(),
            dry_run: self.ctx.dry_run,
            policy: self.ctx.policy.description(),
            locations_synced: reachable.into_iter().map(|l| l.address).collect(),
            locations_unreachable: unreachable,
            files_seen,
            unique_paths: plan.unique_paths,
            conflicts_resolved: plan.conflicts,
            paths_skipped: plan.skipped_paths,
            actions_planned: plan.actions.len(),
            actions_succeeded: exec.succeeded,
            actions_failed: exec.failed,
            bytes_copied: exec.bytes_copied,
            backups,
        })
    }
}

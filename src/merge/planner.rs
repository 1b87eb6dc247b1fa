//! Merge planning: from N inventories to the minimal list of copy actions.

use super::inventory;
use super::location::Location;
use super::record::FileRecord;
use super::resolver::{self, ConflictDecider};
use crate::config::RunContext;
use crate::console;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Why a copy action exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionReason {
    /// The target location has no copy of the file.
    TargetMissing,
    /// The target location holds a different (losing) copy.
    TargetStale,
}

impl ActionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TargetMissing => "target-missing",
            Self::TargetStale => "target-stale",
        }
    }
}

/// One planned file copy. Produced here, consumed by the executor,
/// never persisted.
#[derive(Debug, Clone)]
pub struct SyncAction {
    /// Absolute path of the authoritative copy.
    pub source: PathBuf,
    /// Absolute path the copy is written to.
    pub target: PathBuf,
    pub relative_path: String,
    pub reason: ActionReason,
    /// Host of the target location, re-probed just before the copy.
    pub target_host: Option<String>,
}

/// What the planner found, besides the actions themselves.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    pub actions: Vec<SyncAction>,
    /// Distinct relative paths across all inventories.
    pub unique_paths: usize,
    /// Pairwise resolutions with genuinely different content.
    pub conflicts: usize,
    /// Paths dropped from the run by operator skip.
    pub skipped_paths: usize,
}

/// Compute the copy actions needed to converge all locations.
///
/// Deterministic for fixed inputs and policy: paths iterate in sorted order
/// and candidates in configured location order. Hashes are computed up front
/// for every multi-holder path and cached on the records, so the fold's
/// intermediate winner always carries its own hash into the next comparison.
pub fn plan(
    inventories: &mut [BTreeMap<String, FileRecord>],
    locations: &[Location],
    decider: &mut dyn ConflictDecider,
    ctx: &RunContext,
) -> PlanOutcome {
    let mut outcome = PlanOutcome::default();

    let paths: BTreeSet<String> = inventories
        .iter()
        .flat_map(|inventory| inventory.keys().cloned())
        .collect();
    outcome.unique_paths = paths.len();

    for path in &paths {
        let holders: Vec<usize> = (0..inventories.len())
            .filter(|&i| inventories[i].contains_key(path))
            .collect();

        // Hashing is lazy: only paths held by more than one location ever
        // need content comparison.
        if holders.len() > 1 {
            for &i in &holders {
                if let Some(record) = inventories[i].get_mut(path) {
                    if let Err(err) = record.ensure_hash() {
                        console::warn(format!(
                            "cannot hash {}, falling back to timestamp/size comparison: {}",
                            record.absolute_path.display(),
                            err
                        ));
                    }
                }
            }
        }

        let candidates: Vec<&FileRecord> = holders
            .iter()
            .filter_map(|&i| inventories[i].get(path))
            .collect();

        let winner = if candidates.len() == 1 {
            Some(candidates[0])
        } else {
            let group = resolver::resolve_group(path, &candidates, &ctx.policy, decider, ctx);
            outcome.conflicts += group.conflicts;
            group.winner
        };

        let Some(winner) = winner else {
            outcome.skipped_paths += 1;
            continue;
        };

        for (i, location) in locations.iter().enumerate() {
            match inventories[i].get(path) {
                None => {
                    let target = inventory::native_path(&location.root, path);
                    console::detail(
                        ctx.verbose,
                        format!(
                            "plan: {} -> {} (target-missing)",
                            winner.absolute_path.display(),
                            target.display()
                        ),
                    );
                    outcome.actions.push(SyncAction {
                        source: winner.absolute_path.clone(),
                        target,
                        relative_path: path.clone(),
                        reason: ActionReason::TargetMissing,
                        target_host: location.host.clone(),
                    });
                }
                Some(record) if record.absolute_path != winner.absolute_path => {
                    // Byte-identical losers need no copy: the content has
                    // already converged under this relative path.
                    if record.hash.is_some() && record.hash == winner.hash {
                        continue;
                    }
                    console::detail(
                        ctx.verbose,
                        format!(
                            "plan: {} -> {} (target-stale)",
                            winner.absolute_path.display(),
                            record.absolute_path.display()
                        ),
                    );
                    outcome.actions.push(SyncAction {
                        source: winner.absolute_path.clone(),
                        target: record.absolute_path.clone(),
                        relative_path: path.clone(),
                        reason: ActionReason::TargetStale,
                        target_host: location.host.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    outcome
}

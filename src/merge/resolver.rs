//! Conflict resolution: deciding which copy of a file is authoritative.

use super::record::FileRecord;
use crate::config::RunContext;
use crate::console;
use std::io::{self, BufRead, Write};

/// Policy for resolving file conflicts during a merge.
///
/// Parsing never fails: unrecognized strings are carried verbatim so the
/// documented permissive fallback (warn, keep the first record) stays
/// observable instead of turning a typo into a hard error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Use the copy with the later modification time (default).
    #[default]
    Newest,
    /// Use the copy with the greater byte length.
    Largest,
    /// Ask the operator for each conflict.
    Manual,
    /// Unrecognized policy string, kept as configured.
    Unknown(String),
}

impl ConflictPolicy {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "newest" => Self::Newest,
            "largest" => Self::Largest,
            "manual" => Self::Manual,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Get a human-readable description of the policy.
    pub fn description(&self) -> String {
        match self {
            Self::Newest => "use most recently modified copy".to_string(),
            Self::Largest => "use largest copy".to_string(),
            Self::Manual => "ask for each conflict".to_string(),
            Self::Unknown(raw) => format!("unknown policy {:?}", raw),
        }
    }
}

/// Operator's answer for one manual conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualChoice {
    First,
    Second,
    Skip,
}

/// Source of manual conflict decisions.
///
/// The resolver itself stays pure; the blocking console prompt lives in
/// [`ConsoleDecider`] so tests can substitute a scripted implementation.
pub trait ConflictDecider {
    fn decide(&mut self, relative_path: &str, first: &FileRecord, second: &FileRecord) -> ManualChoice;
}

/// Interactive decider that prompts on the console. Blocks until the
/// operator answers; there is deliberately no timeout.
pub struct ConsoleDecider;

impl ConflictDecider for ConsoleDecider {
    fn decide(&mut self, relative_path: &str, first: &FileRecord, second: &FileRecord) -> ManualChoice {
        println!("conflict on {}:", relative_path);
        println!("  [1] {}", first.describe());
        println!("  [2] {}", second.describe());

        let stdin = io::stdin();
        loop {
            print!("keep [1], [2], or [s]kip? ");
            let _ = io::stdout().flush();

            let mut answer = String::new();
            if stdin.lock().read_line(&mut answer).is_err() {
                return ManualChoice::Skip;
            }
            match answer.trim() {
                "1" => return ManualChoice::First,
                "2" => return ManualChoice::Second,
                "s" | "S" => return ManualChoice::Skip,
                _ => continue,
            }
        }
    }
}

/// Outcome of one pairwise resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// The fold winner so far stays authoritative.
    Keep,
    /// The candidate becomes the new winner.
    Replace,
    /// Drop this relative path from the run entirely.
    Skip,
}

/// Result of folding one conflict group.
pub struct GroupOutcome<'a> {
    /// The authoritative record, or `None` when the operator skipped the path.
    pub winner: Option<&'a FileRecord>,
    /// Number of pairwise steps that were real conflicts (unequal content).
    pub conflicts: usize,
}

/// Fold a group of records for one relative path down to the authoritative
/// one, left to right in configured location order.
///
/// Caller is expected to have attempted `ensure_hash` on every candidate;
/// records whose hash could not be computed fall through to the policy's
/// timestamp/size comparison. An empty group has no winner.
pub fn resolve_group<'a>(
    relative_path: &str,
    candidates: &[&'a FileRecord],
    policy: &ConflictPolicy,
    decider: &mut dyn ConflictDecider,
    ctx: &RunContext,
) -> GroupOutcome<'a> {
    let Some(&first) = candidates.first() else {
        return GroupOutcome { winner: None, conflicts: 0 };
    };
    let mut winner = first;
    let mut conflicts = 0;

    for candidate in &candidates[1..] {
        let identical = winner.hash.is_some() && winner.hash == candidate.hash;
        if !identical {
            conflicts += 1;
        }

        match resolve_pair(relative_path, winner, candidate, policy, decider, ctx) {
            Resolution::Keep => {}
            Resolution::Replace => winner = candidate,
            Resolution::Skip => {
                console::status(
                    "skip",
                    format!("{}: left untouched everywhere by operator choice", relative_path),
                );
                return GroupOutcome { winner: None, conflicts };
            }
        }
    }

    GroupOutcome {
        winner: Some(winner),
        conflicts,
    }
}

/// Resolve one pair. Hash equality short-circuits before the policy is
/// consulted; ties under Newest/Largest keep the fold winner, i.e. the copy
/// from the earlier location in configured order.
fn resolve_pair(
    relative_path: &str,
    winner: &FileRecord,
    candidate: &FileRecord,
    policy: &ConflictPolicy,
    decider: &mut dyn ConflictDecider,
    ctx: &RunContext,
) -> Resolution {
    if let (Some(a), Some(b)) = (&winner.hash, &candidate.hash) {
        if a == b {
            console::detail(
                ctx.verbose,
                format!("{}: identical content at {} and {}", relative_path,
                    winner.absolute_path.display(), candidate.absolute_path.display()),
            );
            return Resolution::Keep;
        }
    }

    match policy {
        ConflictPolicy::Newest => {
            let resolution = if candidate.modified > winner.modified {
                Resolution::Replace
            } else {
                Resolution::Keep
            };
            log_decision(relative_path, winner, candidate, resolution, "newest");
            resolution
        }
        ConflictPolicy::Largest => {
            let resolution = if candidate.len > winner.len {
                Resolution::Replace
            } else {
                Resolution::Keep
            };
            log_decision(relative_path, winner, candidate, resolution, "largest");
            resolution
        }
        ConflictPolicy::Manual => match decider.decide(relative_path, winner, candidate) {
            ManualChoice::First => Resolution::Keep,
            ManualChoice::Second => Resolution::Replace,
            ManualChoice::Skip => Resolution::Skip,
        },
        ConflictPolicy::Unknown(raw) => {
            // Documented permissive fallback: warn loudly, keep the first
            // record, never abort.
            console::error(format!(
                "unknown conflict policy {:?}; keeping {}",
                raw,
                winner.absolute_path.display()
            ));
            Resolution::Keep
        }
    }
}

fn log_decision(
    relative_path: &str,
    winner: &FileRecord,
    candidate: &FileRecord,
    resolution: Resolution,
    policy_name: &str,
) {
    let (kept, dropped) = match resolution {
        Resolution::Replace => (candidate, winner),
        _ => (winner, candidate),
    };
    console::status(
        "conflict",
        format!(
            "{}: kept {} over {} ({})",
            relative_path,
            kept.describe(),
            dropped.describe(),
            policy_name
        ),
    );
}

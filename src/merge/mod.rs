//! Multi-location save-file merge engine.
//!
//! One run: validate locations, inventory each, snapshot each inventory
//! under the archive root, compute the convergence plan, apply it.

pub mod backup;
pub mod engine;
pub mod error;
pub mod executor;
pub mod hasher;
pub mod inventory;
pub mod location;
pub mod planner;
pub mod probe;
pub mod record;
pub mod resolver;

// Re-export commonly used types for convenience
pub use backup::BackupStats;
pub use engine::{MergeEngine, MergeSummary};
pub use error::SyncError;
pub use executor::ExecStats;
pub use location::{Location, Reachability};
pub use planner::{ActionReason, PlanOutcome, SyncAction};
pub use record::FileRecord;
pub use resolver::{ConflictDecider, ConflictPolicy, ConsoleDecider, ManualChoice};

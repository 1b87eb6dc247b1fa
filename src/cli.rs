//! Command-line definitions.
//!
//! Locations are a repeatable `--location` flag: one value per flag, no
//! delimiter splitting or argument reconstruction anywhere.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "savesync")]
#[command(about = "Merge game saves across machines and shuttle them to a device", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge save directories across locations with backups
    Merge(MergeArgs),
    /// Pull a path from the device to the local filesystem
    Pull(TransferArgs),
    /// Push a local path to the device
    Push(TransferArgs),
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Location taking part in the merge; repeat for each one
    #[arg(long = "location", value_name = "PATH")]
    pub locations: Vec<String>,

    /// Directory for pre-run backups
    #[arg(long, value_name = "PATH")]
    pub archive_root: Option<PathBuf>,

    /// Conflict policy: newest, largest or manual
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<String>,

    /// Log intent only; write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Fine-grained diagnostic logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file supplying defaults for the flags above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Path on the device
    #[arg(long, value_name = "PATH")]
    pub remote: String,

    /// Path on this machine
    #[arg(long, value_name = "PATH")]
    pub local: PathBuf,

    /// Device address, e.g. 127.0.0.1:21503
    #[arg(long, value_name = "ADDR")]
    pub device: Option<String>,

    /// Emulator config file mapping instances to adb ports
    #[arg(long, value_name = "FILE", requires = "instance")]
    pub emulator_config: Option<PathBuf>,

    /// Emulator instance key to look up in the config file
    #[arg(long, value_name = "KEY", requires = "emulator_config")]
    pub instance: Option<String>,

    /// adb binary to invoke
    #[arg(long, default_value = "adb")]
    pub adb: String,

    /// Transfer attempts before giving up
    #[arg(long, default_value_t = 3)]
    pub retries: u32,
}

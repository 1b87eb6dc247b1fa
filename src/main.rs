use anyhow::{bail, Result};
use clap::Parser;
use std::process;

use savesync::cli::{Cli, Commands, MergeArgs, TransferArgs};
use savesync::config::{self, FileConfig, RunContext};
use savesync::console;
use savesync::device::bridge::{Bridge, Direction};
use savesync::device::emulator;
use savesync::merge::{ConflictPolicy, MergeEngine, SyncError};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NO_LOCATIONS: i32 = 2;

fn main() {
    let cli = Cli::parse();
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            console::error(format!("{:#}", err));
            EXIT_FAILURE
        }
    };
    process::exit(code);
}

fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Merge(args) => run_merge(args),
        Commands::Pull(args) => run_transfer(Direction::Pull, args),
        Commands::Push(args) => run_transfer(Direction::Push, args),
    }
}

fn run_merge(args: MergeArgs) -> Result<i32> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::load_default(),
    };

    let locations = if args.locations.is_empty() {
        file_config.locations.unwrap_or_default()
    } else {
        args.locations
    };
    if locations.is_empty() {
        bail!("no locations given; pass --location at least once or set `locations` in the config file");
    }

    let policy = args
        .policy
        .or(file_config.policy)
        .map(|raw| ConflictPolicy::parse(&raw))
        .unwrap_or_default();
    let archive_root = args
        .archive_root
        .or(file_config.archive_root)
        .unwrap_or_else(config::default_archive_root);

    let ctx = RunContext {
        dry_run: args.dry_run,
        verbose: args.verbose,
        policy,
    };

    let engine = MergeEngine::new(&locations, archive_root, ctx);
    match engine.run() {
        Ok(summary) => {
            if args.json {
                println!("{}", summary.to_json()?);
            } else {
                summary.display();
            }
            Ok(EXIT_OK)
        }
        Err(SyncError::NoLocationsReachable) => {
            console::error("none of the configured locations are reachable");
            Ok(EXIT_NO_LOCATIONS)
        }
        Err(err) => Err(err.into()),
    }
}

fn run_transfer(direction: Direction, args: TransferArgs) -> Result<i32> {
    let file_config = FileConfig::load_default();

    let device = match (&args.emulator_config, &args.instance) {
        (Some(path), Some(instance)) => {
            let port = emulator::lookup_port(path, instance)?;
            Some(emulator::address_for("127.0.0.1", port))
        }
        _ => args.device.or(file_config.device),
    };

    let adb = if args.adb == "adb" {
        file_config.adb.unwrap_or(args.adb)
    } else {
        args.adb
    };

    let bridge = Bridge::new(adb, device.clone()).with_retries(args.retries);
    if let Some(address) = &device {
        bridge.connect(address)?;
    }

    let outcome = bridge.transfer(direction, &args.remote, &args.local)?;
    if outcome.success {
        let (from, to) = match direction {
            Direction::Pull => (args.remote.clone(), args.local.display().to_string()),
            Direction::Push => (args.local.display().to_string(), args.remote.clone()),
        };
        console::status("transfer", format!("{} -> {}", from, to));
        Ok(EXIT_OK)
    } else {
        console::error(format!("adb exited with code {}", outcome.exit_code));
        for line in &outcome.output {
            eprintln!("  {}", line);
        }
        Ok(EXIT_FAILURE)
    }
}

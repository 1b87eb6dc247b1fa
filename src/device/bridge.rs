//! Thin retrying wrapper around the adb binary for pulling and pushing
//! save files to a device or emulator.
//!
//! Transfers are idempotent and safe to retry; pulls land in a `.part`
//! staging file renamed into place on success, so a failed pull leaves local
//! state unchanged.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use crate::console;

const CONNECT_POLL_ATTEMPTS: u32 = 10;
const CONNECT_POLL_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Pull,
    Push,
}

impl Direction {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Push => "push",
        }
    }
}

/// Result of one transfer, including the captured adb output for diagnostics.
#[derive(Debug)]
pub struct TransferOutcome {
    pub success: bool,
    pub exit_code: i32,
    pub output: Vec<String>,
}

pub struct Bridge {
    adb: String,
    device: Option<String>,
    retries: u32,
    backoff: Duration,
}

impl Bridge {
    pub fn new(adb: impl Into<String>, device: Option<String>) -> Self {
        Self {
            adb: adb.into(),
            device,
            retries: 3,
            backoff: Duration::from_secs(2),
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    /// Connect to a networked device and poll `adb devices` until it shows
    /// as `device` (not `offline`), bounded attempts.
    pub fn connect(&self, address: &str) -> Result<()> {
        self.run(&["connect", address])
            .context("running adb connect")?;

        for attempt in 1..=CONNECT_POLL_ATTEMPTS {
            let (_, lines) = self.run(&["devices"]).context("running adb devices")?;
            match device_state(&lines, address) {
                Some(state) if state == "device" => {
                    console::status("device", format!("{} is online", address));
                    return Ok(());
                }
                Some(state) => console::info(format!(
                    "{} is {} ({}/{})",
                    address, state, attempt, CONNECT_POLL_ATTEMPTS
                )),
                None => console::info(format!(
                    "{} not listed yet ({}/{})",
                    address, attempt, CONNECT_POLL_ATTEMPTS
                )),
            }
            thread::sleep(CONNECT_POLL_DELAY);
        }

        bail!("device {} did not come online", address)
    }

    /// Pull or push one path, retrying with linear backoff.
    pub fn transfer(
        &self,
        direction: Direction,
        remote: &str,
        local: &Path,
    ) -> Result<TransferOutcome> {
        let staging = match direction {
            Direction::Pull => Some(staging_path(local)),
            Direction::Push => None,
        };

        if let (Direction::Pull, Some(parent)) = (direction, local.parent()) {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let local_str = local.to_string_lossy().into_owned();
        let staging_str = staging.as_ref().map(|p| p.to_string_lossy().into_owned());

        let mut last_code = -1;
        let mut last_output = Vec::new();

        for attempt in 1..=self.retries {
            let args: Vec<&str> = match direction {
                Direction::Pull => vec![
                    "pull",
                    remote,
                    staging_str.as_deref().unwrap_or(&local_str),
                ],
                Direction::Push => vec!["push", &local_str, remote],
            };

            let (code, lines) = self.run(&args)?;
            if code == 0 {
                if let Some(staging) = &staging {
                    fs::rename(staging, local).with_context(|| {
                        format!("moving {} into place", staging.display())
                    })?;
                }
                return Ok(TransferOutcome {
                    success: true,
                    exit_code: 0,
                    output: lines,
                });
            }

            last_code = code;
            last_output = lines;
            if attempt < self.retries {
                let delay = self.backoff * attempt;
                console::warn(format!(
                    "adb {} failed (exit {}) on attempt {}/{}, retrying in {}s",
                    direction.as_arg(),
                    code,
                    attempt,
                    self.retries,
                    delay.as_secs()
                ));
                thread::sleep(delay);
            }
        }

        if let Some(staging) = &staging {
            let _ = fs::remove_file(staging);
        }

        Ok(TransferOutcome {
            success: false,
            exit_code: last_code,
            output: last_output,
        })
    }

    fn run(&self, args: &[&str]) -> Result<(i32, Vec<String>)> {
        let mut cmd = Command::new(&self.adb);
        // connect/devices address the server, not one device
        let global = matches!(args.first(), Some(&"connect") | Some(&"devices"));
        if let (false, Some(device)) = (global, &self.device) {
            cmd.args(["-s", device]);
        }

        let output = cmd
            .args(args)
            .output()
            .with_context(|| format!("spawning {}", self.adb))?;

        let code = output.status.code().unwrap_or(-1);
        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_string)
            .collect();

        Ok((code, lines))
    }
}

fn staging_path(local: &Path) -> PathBuf {
    let mut name = local.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Parse `adb devices` output for the state of one device address.
pub fn device_state(lines: &[String], address: &str) -> Option<String> {
    for line in lines {
        let mut parts = line.split_whitespace();
        if parts.next() == Some(address) {
            return parts.next().map(str::to_string);
        }
    }
    None
}

//! Locations: the directories (local or network share) taking part in a merge.

use super::error::SyncError;
use super::probe;
use crate::config::RunContext;
use crate::console;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Reachability state of a location, set by [`Location::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

/// One directory participating in a merge.
#[derive(Debug, Clone)]
pub struct Location {
    /// The address as configured, e.g. `D:\Saves` or `\\deck\saves`.
    pub address: String,
    /// The address as a filesystem path.
    pub root: PathBuf,
    /// Host component for network-share addresses, `None` for local paths.
    pub host: Option<String>,
    pub reachability: Reachability,
}

impl Location {
    /// Parse an address string. UNC-style addresses (`\\host\share` or the
    /// forward-slash spelling) are recognized as network locations.
    pub fn parse(address: &str) -> Self {
        Self {
            address: address.to_string(),
            root: PathBuf::from(address),
            host: host_of(address),
            reachability: Reachability::Unknown,
        }
    }

    pub fn is_network(&self) -> bool {
        self.host.is_some()
    }

    /// Validate the location for this run.
    ///
    /// Network hosts get a transport probe first, but a negative answer is a
    /// soft warning only. The location counts as unreachable only when the
    /// directory can neither be listed nor created.
    pub fn validate(&mut self, ctx: &RunContext) -> Result<(), SyncError> {
        if let Some(host) = &self.host {
            if !probe::host_reachable(host) {
                console::warn(format!(
                    "host {} did not answer the reachability probe; trying the share anyway",
                    host
                ));
            }
        }

        let list_err = match fs::read_dir(&self.root) {
            Ok(_) => {
                self.reachability = Reachability::Reachable;
                return Ok(());
            }
            Err(err) => err,
        };

        if ctx.dry_run {
            // A missing root would be created on a real run; count it as an
            // empty, reachable location.
            if list_err.kind() == io::ErrorKind::NotFound {
                console::detail(
                    ctx.verbose,
                    format!("{}: missing, would be created", self.address),
                );
                self.reachability = Reachability::Reachable;
                return Ok(());
            }
            self.reachability = Reachability::Unreachable;
            return Err(SyncError::LocationUnreachable {
                address: self.address.clone(),
                reason: format!("cannot list: {}", list_err),
            });
        }

        match fs::create_dir_all(&self.root) {
            Ok(()) => {
                self.reachability = Reachability::Reachable;
                Ok(())
            }
            Err(create_err) => {
                self.reachability = Reachability::Unreachable;
                Err(SyncError::LocationUnreachable {
                    address: self.address.clone(),
                    reason: format!("cannot list ({}) or create ({})", list_err, create_err),
                })
            }
        }
    }

    /// Sanitized form of the address for backup directory names:
    /// separators, colons and spaces become underscores.
    pub fn sanitized_name(&self) -> String {
        let replaced: String = self
            .address
            .chars()
            .map(|c| match c {
                '\\' | '/' | ':' | ' ' => '_',
                c => c,
            })
            .collect();
        let trimmed = replaced.trim_matches('_');
        if trimmed.is_empty() {
            "location".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn host_of(address: &str) -> Option<String> {
    let rest = address
        .strip_prefix("\\\\")
        .or_else(|| address.strip_prefix("//"))?;
    let host: String = rest
        .chars()
        .take_while(|c| *c != '\\' && *c != '/')
        .collect();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

//! Emulator instance-to-port lookup from a key-value config file.
//!
//! The file maps instance identifiers to adb ports, one `key=value` per
//! line; `#` and `;` start comments. Read once per run.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Look up the adb port for an emulator instance.
pub fn lookup_port(path: &Path, instance: &str) -> Result<u16> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading emulator config {}", path.display()))?;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() == instance {
            let value = value.trim();
            return value.parse::<u16>().with_context(|| {
                format!("instance {} has a non-port value {:?}", instance, value)
            });
        }
    }

    bail!("instance {} not found in {}", instance, path.display())
}

/// Format an adb connect address from host and port.
pub fn address_for(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

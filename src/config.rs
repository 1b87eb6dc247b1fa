//! Run configuration: the explicit context threaded through every component
//! and the optional TOML config file that supplies CLI defaults.

use crate::console;
use crate::merge::resolver::ConflictPolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Per-run settings passed explicitly into every component call.
/// No ambient globals: this is what makes the engine testable.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Log intent only; suppress every mutating filesystem/network action.
    pub dry_run: bool,
    /// Fine-grained diagnostic logging.
    pub verbose: bool,
    pub policy: ConflictPolicy,
}

/// Optional config file. Explicit CLI flags always win over these values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub locations: Option<Vec<String>>,
    pub archive_root: Option<PathBuf>,
    pub policy: Option<String>,
    pub adb: Option<String>,
    pub device: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load the default config file if one exists; a broken file is a
    /// warning, not a fatal error.
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                console::warn(format!("ignoring config file: {:#}", err));
                Self::default()
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("savesync").join("config.toml"))
}

/// Default archive root under the operator's document area.
pub fn default_archive_root() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("savesync-backups")
}

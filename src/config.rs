//! Configuration store and workspace layout.
//!
//! `config.json` lists the preference identifiers that take part in
//! snapshots. A missing or unusable document is replaced by the built-in
//! default, which is written back so later loads see the same content.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::Result;

pub const APP_DIR: &str = "macswitcher";
pub const CONFIG_FILE: &str = "config.json";
pub const SNAPSHOTS_DIR: &str = "snapshots";
pub const LOG_FILE: &str = "macswitcher.log";

pub const DEFAULT_PLIST_FILES: [&str; 6] = [
    "com.apple.dock",
    ".GlobalPreferences",
    "com.apple.WindowManager",
    "com.apple.finder",
    "com.apple.HIToolbox",
    "NSGlobalDomain",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "BackupTargets")]
    pub backup_targets: BackupTargets,

    #[serde(rename = "SelfSetting", default)]
    pub self_setting: SelfSetting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupTargets {
    pub plist_files: Vec<String>,
}

/// Settings of the tool itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfSetting {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub startwithreboot: bool,
    #[serde(default)]
    pub adding2focus: bool,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for SelfSetting {
    fn default() -> Self {
        Self {
            language: default_language(),
            startwithreboot: false,
            adding2focus: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_targets: BackupTargets {
                plist_files: DEFAULT_PLIST_FILES.iter().map(|s| s.to_string()).collect(),
            },
            self_setting: SelfSetting::default(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to (and persisting) the default.
    ///
    /// Never fails. A failure to write the default is logged and the
    /// in-memory default is returned anyway.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Config>(&contents) {
                Ok(config) if !config.backup_targets.plist_files.is_empty() => {
                    info!(
                        path = %path.display(),
                        targets = config.backup_targets.plist_files.len(),
                        "Loaded config"
                    );
                    return config;
                }
                Ok(_) => {
                    warn!(path = %path.display(), "Config lists no plist files, using default");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Config is malformed, using default");
                }
            },
            Err(e) => {
                info!(path = %path.display(), error = %e, "No readable config, using default");
            }
        }

        let config = Config::default();
        match config.save(path) {
            Ok(()) => info!(path = %path.display(), "Created default config"),
            Err(e) => error!(path = %path.display(), error = %e, "Failed to write default config"),
        }
        config
    }

    /// Write the document with 4-space indentation
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');

        fs::write(path, buf)?;
        Ok(())
    }

    pub fn plist_files(&self) -> &[String] {
        &self.backup_targets.plist_files
    }
}

/// Where the tool keeps its own files
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `--root` if given, otherwise `<config dir>/macswitcher`, otherwise the working directory
    pub fn resolve(root: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        Self::new(root)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join(SNAPSHOTS_DIR)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }
}

/// Settle delays around service restarts. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    /// Fixed wait after the dock read-back probe
    pub dock_settle: Duration,
    /// Upper bound on waiting for restarted services to come back
    pub restart_timeout: Duration,
    pub restart_poll: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            dock_settle: Duration::from_secs(1),
            restart_timeout: Duration::from_secs(5),
            restart_poll: Duration::from_millis(200),
        }
    }
}

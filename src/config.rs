//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/quotebook/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Every field has a default, so a partial
//! file (or no file at all) is valid.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/quotebook/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Remote endpoint used for sync (GET) and push (POST).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whether the periodic sync runs at all.
    #[serde(default = "default_true")]
    pub sync_enabled: bool,

    /// Seconds between two scheduled syncs.
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    /// Maximum number of remote records mapped per sync.
    #[serde(default = "default_max_remote_records")]
    pub max_remote_records: usize,

    /// Category assigned to quotes coming from the remote endpoint.
    #[serde(default = "default_remote_category")]
    pub remote_category: String,

    /// Push manually added quotes to the remote endpoint.
    #[serde(default = "default_true")]
    pub push_on_add: bool,

    /// HTTP request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long a status-bar notification stays visible.
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,

    /// Default path offered by the export prompt.
    #[serde(default = "default_export_file")]
    pub export_file: PathBuf,
}

fn default_endpoint() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sync_interval_secs() -> u64 {
    30
}

fn default_max_remote_records() -> usize {
    5
}

fn default_remote_category() -> String {
    "server".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_notification_secs() -> u64 {
    4
}

fn default_export_file() -> PathBuf {
    PathBuf::from(crate::quote::transfer::EXPORT_FILE_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            sync_enabled: true,
            sync_interval_secs: default_sync_interval_secs(),
            max_remote_records: default_max_remote_records(),
            remote_category: default_remote_category(),
            push_on_add: true,
            request_timeout_secs: default_request_timeout_secs(),
            notification_secs: default_notification_secs(),
            export_file: default_export_file(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "using default configuration");
                Self::default()
            }
        }
    }

    /// Try to load configuration, returning an error on failure.
    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "quotebook")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }

    pub fn sync_interval(&self) -> Duration {
        // A zero interval would turn the schedule into a busy loop
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_ttl(&self) -> chrono::Duration {
        // Capped at a day; chrono panics on out-of-range durations
        chrono::Duration::seconds(self.notification_secs.min(86_400) as i64)
    }
}

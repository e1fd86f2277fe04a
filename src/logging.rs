//! File-based logging bootstrap.
//!
//! The terminal belongs to the TUI while the app runs, so `tracing` output is
//! written to `<data_dir>/quotebook.log`. The filter comes from the
//! `QUOTEBOOK_LOG` environment variable (same syntax as `RUST_LOG`), defaulting
//! to `info`.
//!
//! Initialization is idempotent for the same directory and never panics.

use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "QUOTEBOOK_LOG";

const LOG_FILE_NAME: &str = "quotebook.log";
const DEFAULT_FILTER: &str = "info";

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Start logging into `log_dir`. Returns the log file path.
///
/// Calling this again with the same directory is a no-op; a different
/// directory is rejected because the global subscriber cannot be replaced.
pub fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    let path = log_dir.join(LOG_FILE_NAME);

    if let Some(existing) = LOG_FILE.get() {
        if *existing == path {
            return Ok(path);
        }
        bail!(
            "logging already initialized at {}; refusing to switch to {}",
            existing.display(),
            path.display()
        );
    }

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    let _ = LOG_FILE.set(path.clone());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        "logging started"
    );

    Ok(path)
}

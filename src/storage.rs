//! # Key-Value Storage
//!
//! Persistent and session-scoped storage for quotebook state.
//!
//! ## Storage Location
//!
//! ```text
//! ~/.local/share/quotebook/
//! ├── storage/
//! │   ├── quotes.json
//! │   └── selectedCategory.json
//! └── session/
//!     └── lastQuote.json
//! ```
//!
//! Each key is stored in its own JSON file. The `session/` directory is
//! cleared when the application exits, so values written there only survive
//! a reload within the same run.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Durable key holding the JSON array of quotes
pub const QUOTES_KEY: &str = "quotes";

/// Durable key holding the category selected in the list filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Session key holding the last displayed quote
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// A string key-value store.
///
/// Values are opaque strings; callers decide on the encoding (JSON in practice).
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every value.
    fn clear(&self) -> Result<()>;
}

/// Stores every key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage file: {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        // Write-then-rename so a crash never leaves a truncated value behind
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)
            .with_context(|| format!("Failed to write storage file: {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace storage file: {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage file: {}", path.display()))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list storage directory: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove storage file: {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// The durable and session stores used by one run of the app
pub struct Storage {
    pub local: Arc<dyn KeyValueStore>,
    pub session: Arc<dyn KeyValueStore>,
}

impl Storage {
    /// File-backed storage under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            local: Arc::new(FileStore::open(data_dir.join("storage"))?),
            session: Arc::new(FileStore::open(data_dir.join("session"))?),
        })
    }

    /// Purely in-memory storage
    pub fn in_memory() -> Self {
        Self {
            local: Arc::new(MemoryStore::new()),
            session: Arc::new(MemoryStore::new()),
        }
    }

    /// Drop all session-scoped values. Called when the session ends.
    pub fn end_session(&self) -> Result<()> {
        self.session.clear()
    }
}

/// Get the platform data directory for quotebook
pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", "quotebook")
        .context("Failed to determine application data directory")?;

    Ok(proj_dirs.data_dir().to_path_buf())
}

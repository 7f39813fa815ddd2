//! Key-value storage backends for cart data
//!
//! Provides:
//! - `CartStore`, the get/set interface the sanitizer runs against
//! - `InMemoryStore` for tests and embedding
//! - `FileStore` for local-storage dump files on disk

use dashmap::DashMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{CartError, CartResult};

/// Synchronous key-value store holding serialized blobs
pub trait CartStore: Send + Sync {
    /// Read the value stored under `key`, `None` when nothing is stored
    fn get(&self, key: &str) -> CartResult<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> CartResult<()>;
}

impl<S: CartStore + ?Sized> CartStore for &S {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CartResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory store for testing and development
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, String>>,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without counting it as a write
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Current value under `key`
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Number of `set` calls served so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CartStore for InMemoryStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        Ok(self.snapshot(key))
    }

    fn set(&self, key: &str, value: &str) -> CartResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Local-storage dump on disk.
///
/// The file is a JSON object mapping storage keys to string values. A missing
/// file is an empty store; it is created on the first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CartResult<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(CartError::Storage(format!(
                "storage file {} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(CartError::Storage(format!(
                "storage file {} is unreadable: {e}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, entries: &Map<String, Value>) -> CartResult<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| CartError::Storage(format!("failed to serialize storage: {e}")))?;

        // Sibling temp file, then rename over the target
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %cleanup, "failed to remove temp storage file");
            }
            return Err(e.into());
        }

        debug!(path = %self.path.display(), "storage file written");
        Ok(())
    }
}

impl CartStore for FileStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        let entries = self.load()?;
        Ok(entries.get(key).map(|value| match value {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> CartResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&entries)
    }
}

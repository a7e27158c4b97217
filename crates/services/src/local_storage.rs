//! Client-local key/value persistence, the browser `localStorage` analogue.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use octavian_config::SessionSettings;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum LocalStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt local storage file: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStorageError>;
    fn remove(&self, key: &str) -> Result<(), LocalStorageError>;
}

#[derive(Default)]
pub struct MemoryLocalStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every mutation. Inside a tokio runtime
/// the rewrite runs on the blocking pool; reads are served from memory.
pub struct FileLocalStorage {
    writer: Arc<FileWriter>,
    entries: Mutex<HashMap<String, String>>,
    version: AtomicU64,
}

struct FileWriter {
    path: PathBuf,
    /// Version of the last snapshot on disk.
    written: Mutex<u64>,
}

impl FileWriter {
    /// Older snapshots than the one on disk are skipped.
    fn write(
        &self,
        version: u64,
        entries: &HashMap<String, String>,
    ) -> Result<(), LocalStorageError> {
        let mut written = self.written.lock();
        if version <= *written {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        *written = version;
        Ok(())
    }
}

impl FileLocalStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocalStorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            writer: Arc::new(FileWriter {
                path,
                written: Mutex::new(0),
            }),
            entries: Mutex::new(entries),
            version: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.writer.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), LocalStorageError> {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = entries.clone();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return self.writer.write(version, &snapshot);
        };
        let writer = Arc::clone(&self.writer);
        handle.spawn_blocking(move || {
            if let Err(e) = writer.write(version, &snapshot) {
                warn!(path = %writer.path.display(), error = %e, "Failed to write local storage");
            }
        });
        Ok(())
    }
}

impl LocalStorage for FileLocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), LocalStorageError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// File-backed when `session.local_storage_path` is configured, in-memory otherwise.
pub fn from_settings(
    settings: &SessionSettings,
) -> Result<Arc<dyn LocalStorage>, LocalStorageError> {
    Ok(match &settings.local_storage_path {
        Some(path) => Arc::new(FileLocalStorage::open(path)?),
        None => Arc::new(MemoryLocalStorage::new()),
    })
}

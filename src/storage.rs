use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Could not determine data directory")]
    NoDataDir,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not encode storage file: {0}")]
    Encode(#[from] serde_json::Error),
}

// ─── Key-value store ────────────────────────────────────────────────────────

/// A string key-value store that survives restarts.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// All keys live in one JSON object on disk. Every `set` rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("clockboard").join("storage.json"))
    }

    pub fn open_default() -> Result<Self, StorageError> {
        Self::default_path()
            .map(Self::new)
            .ok_or(StorageError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An unreadable or corrupt file reads as empty.
    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(contents) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "storage file is corrupt");
            BTreeMap::new()
        })
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// In-process storage; nothing outlives the value.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.to_string(), value.to_string());
        storage
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage whose writes always fail, as on a full or read-only disk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingStorage;

#[cfg(test)]
impl Storage for FailingStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: PathBuf::from("storage.json"),
            source: std::io::Error::other("disk full"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = FileStorage::new(&path);
        assert_eq!(storage.get("deadlines"), None);
        storage.set("deadlines", "[]").unwrap();
        storage.set("other", "1").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("deadlines").as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").as_deref(), Some("1"));
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut storage = FileStorage::new(&path);
        assert_eq!(storage.get("deadlines"), None);
        storage.set("deadlines", "[]").unwrap();
        assert_eq!(storage.get("deadlines").as_deref(), Some("[]"));
    }

    #[test]
    fn memory_storage_overwrites() {
        let mut storage = MemoryStorage::with("k", "a");
        storage.set("k", "b").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("b"));
    }
}

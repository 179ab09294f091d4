use crate::error::{DeskError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// String key/value storage
///
/// Writes replace the whole value for a key. There is no locking or
/// versioning: concurrent writers race and the last write wins.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process backend, optionally with a byte quota
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once the total stored bytes would
    /// exceed `quota`
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RwLock::default(),
            quota: Some(quota),
        }
    }

    fn poisoned() -> DeskError {
        DeskError::custom("memory storage lock poisoned")
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;

        if let Some(limit) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(DeskError::QuotaExceeded { needed, limit });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.remove(key);
        Ok(())
    }
}

/// Backend storing each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(DeskError::InvalidInput(format!(
                "Invalid storage key '{key}': use letters, digits, '-', '_' or '.'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "wrote storage item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert!(backend.get_item("k").unwrap().is_none());

        backend.set_item("k", "v1").unwrap();
        backend.set_item("k", "v2").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("v2"));

        backend.remove_item("k").unwrap();
        backend.remove_item("k").unwrap();
        assert!(backend.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_backend_quota() {
        let backend = MemoryBackend::with_quota(10);
        backend.set_item("key", "1234567").unwrap();

        let err = backend.set_item("key", "12345678").unwrap_err();
        assert!(matches!(err, DeskError::QuotaExceeded { needed: 11, limit: 10 }));
        assert_eq!(backend.get_item("key").unwrap().as_deref(), Some("1234567"));
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("data"));

        assert!(backend.get_item("tickets").unwrap().is_none());
        backend.set_item("tickets", "[]").unwrap();
        assert_eq!(backend.get_item("tickets").unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("data").join("tickets.json").exists());

        backend.remove_item("tickets").unwrap();
        assert!(backend.get_item("tickets").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_rejects_path_keys() {
        let backend = FileBackend::new("/tmp/unused");
        assert!(backend.path_for("../escape").is_err());
        assert!(backend.path_for("a/b").is_err());
        assert!(backend.path_for("").is_err());
        assert!(backend.path_for("gcp-support-tickets").is_ok());
    }
}

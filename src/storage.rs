use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Small persistent key-value store backed by one JSON file.
///
/// Every mutation is written through to disk immediately (temp file + rename),
/// so two processes see each other's last write on their next `open`.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Storage {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "storage file is malformed, starting empty");
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "storage file is unreadable, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_roundtrip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let mut storage = Storage::open(&path).unwrap();
            storage.set("moviemind_theme", "light".to_string()).unwrap();
            storage.set("other", "x".to_string()).unwrap();
            storage.remove("other").unwrap();
        }

        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.get("moviemind_theme"), Some("light"));
        assert_eq!(storage.get("other"), None);
    }

    #[test]
    fn test_malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut storage = Storage::open(&path).unwrap();
        assert_eq!(storage.get("anything"), None);

        storage.set("k", "v".to_string()).unwrap();
        assert_eq!(Storage::open(&path).unwrap().get("k"), Some("v"));
    }

    #[test]
    fn test_invalid_utf8_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();

        let mut storage = Storage::open(&path).unwrap();
        assert_eq!(storage.get("moviemind_user"), None);

        storage.set("moviemind_theme", "light".to_string()).unwrap();
        assert_eq!(Storage::open(&path).unwrap().get("moviemind_theme"), Some("light"));
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let mut storage = Storage::open(&path).unwrap();
        storage.set("k", "v".to_string()).unwrap();
        assert!(path.exists());
    }
}

//! File-backed storage backend.
//!
//! All keys live in one JSON object document:
//!
//! ```json
//! { "@RocketShoes:cart": "[{\"id\":1,\"amount\":2}]" }
//! ```
//!
//! Writes go to a sibling temp file which is then renamed over the
//! document, so readers never observe a half-written file.
//!
//! A document that does not parse is moved aside to `<path>.corrupt` on the
//! next write and replaced with a fresh one.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{CartStorage, StorageError};

/// Storage persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Use `path` as the backing document. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.sibling(".tmp");

        fs::write(&tmp, serde_json::to_vec(document)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), keys = document.len(), "Storage document written");
        Ok(())
    }
}

impl CartStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut document = self.read_document()?;
        Ok(document.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut document = match self.read_document() {
            Err(StorageError::Corrupt(e)) => {
                let backup = self.sibling(".corrupt");
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Storage document is corrupt, starting a new one"
                );
                fs::rename(&self.path, &backup)?;
                BTreeMap::new()
            }
            document => document?,
        };
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        assert_eq!(storage.get_item("@RocketShoes:cart").unwrap(), None);
    }

    #[test]
    fn test_write_then_read_in_fresh_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStorage::new(&path)
            .set_item("@RocketShoes:cart", r#"[{"id":1,"amount":2}]"#)
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_item("@RocketShoes:cart").unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":2}]"#)
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        storage.set_item("theme", "dark").unwrap();
        storage.set_item("@RocketShoes:cart", "[]").unwrap();
        storage.set_item("@RocketShoes:cart", "[{\"id\":3,\"amount\":1}]").unwrap();

        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            storage.get_item("@RocketShoes:cart").unwrap().as_deref(),
            Some("[{\"id\":3,\"amount\":1}]")
        );
    }

    #[test]
    fn test_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStorage::new(&path).get_item("k").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }

    #[test]
    fn test_write_replaces_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        let storage = FileStorage::new(&path);

        storage.set_item("@RocketShoes:cart", "[]").unwrap();
        storage.set_item("theme", "dark").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_item("@RocketShoes:cart").unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            fs::read_to_string(dir.path().join("storage.json.corrupt")).unwrap(),
            "{not json"
        );
    }
}

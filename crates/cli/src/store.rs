//! JSON-file key-value store.
//!
//! The whole profile lives in one JSON object mapping keys to their string
//! values, the same layout a browser profile has. Every write rewrites the
//! file through a temporary sibling and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use elite_cards_core::{KeyValueStore, StoreError};

/// Default profile file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".elite-cards.json";

/// Key-value store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StoreError::Backend(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoreError::Backend(format!("{}: {e}", self.path.display()))),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| StoreError::Backend(format!("{}: {e}", self.path.display())))
    }

    fn modify(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        change(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("elite-cli-{}.json", uuid::Uuid::new_v4())))
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let file = TempFile::new();
        let store = FileStore::new(&file.0);
        assert!(store.get("cart").unwrap().is_none());
    }

    #[test]
    fn test_values_persist_across_instances() {
        let file = TempFile::new();
        FileStore::new(&file.0).set("cart", r#"[{"id":"card-1","quantity":2}]"#).unwrap();

        let reopened = FileStore::new(&file.0);
        assert_eq!(
            reopened.get("cart").unwrap().as_deref(),
            Some(r#"[{"id":"card-1","quantity":2}]"#)
        );

        reopened.remove("cart").unwrap();
        assert!(FileStore::new(&file.0).get("cart").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_a_backend_error() {
        let file = TempFile::new();
        fs::write(&file.0, "not json").unwrap();
        let err = FileStore::new(&file.0).get("cart").unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}

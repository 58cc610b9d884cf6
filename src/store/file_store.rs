//! File-backed key-value store
//!
//! Directory structure:
//! ```text
//! {data-dir}/
//! ├── flashcards_app_registry_v1.json
//! ├── flashcards_active_unit_v1.json
//! └── flashcards_unit_{unit-id}.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, Result, StoreError};

pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed
    pub fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        // Write then rename so a crash never leaves a half-written blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_round_trip_through_disk() {
        let (mut store, _temp) = create_test_store();

        store.set("flashcards_unit_u1", "[]").unwrap();
        assert_eq!(store.get("flashcards_unit_u1").unwrap().as_deref(), Some("[]"));
        assert!(store.base_path().join("flashcards_unit_u1.json").exists());

        store.remove("flashcards_unit_u1").unwrap();
        assert_eq!(store.get("flashcards_unit_u1").unwrap(), None);
    }

    #[test]
    fn test_missing_key_is_none() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get("nothing_here").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (mut store, _temp) = create_test_store();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.remove("a/b"), Err(StoreError::InvalidKey(_))));
    }
}

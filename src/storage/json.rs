use std::{
    fs::{self, OpenOptions, rename, write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::{
    models::store::{CURRENT_VERSION, Store},
    storage::{
        Storage, StorageError,
        migrations::{check_version, detect_version},
    },
};

pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| StorageError::SaveFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })
            }
            _ => Ok(()),
        }
    }

    /// Moves `temp_path` over the store file while holding the lock
    fn replace_with(&self, temp_path: &Path) -> Result<(), StorageError> {
        let lock_file_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path,
                source: e,
            })?;

        rename(temp_path, &self.path).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Store, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                check_version(detect_version(&self.path, &content)?)?;

                let mut data: serde_json::Value =
                    serde_json::from_str(&content).map_err(|e| StorageError::ParseFailed {
                        path: self.path.clone(),
                        source: e,
                    })?;

                if let Some(obj) = data.as_object_mut() {
                    obj.insert("version".to_string(), serde_json::json!(CURRENT_VERSION));
                }

                serde_json::from_value(data).map_err(|e| StorageError::ParseFailed {
                    path: self.path.clone(),
                    source: e,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Store::default()),
            Err(e) => Err(StorageError::LoadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        self.ensure_parent_dir()?;

        let json =
            to_string_pretty(store).map_err(|e| StorageError::SerializeFailed { source: e })?;

        let temp_path = PathBuf::from(format!("{}.tmp.{}", self.path.display(), Uuid::new_v4()));
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        let result = self.replace_with(&temp_path);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &tempfile::TempDir) -> JsonFileStorage {
        JsonFileStorage::new(dir.path().join("registro").join("session.json"))
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let mut store = Store::default();
        store.insert("userName", "ana");
        storage.save(&store).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.get("userName"), Some("ana"));
        assert_eq!(loaded.version, CURRENT_VERSION);
    }

    #[test]
    fn test_missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = storage_in(&dir).load().unwrap();
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        match JsonFileStorage::new(path).load() {
            Err(StorageError::ParseFailed { .. }) => {}
            _ => panic!("Expected ParseFailed error, got something else"),
        }
    }

    #[test]
    fn test_load_v1_without_version_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v1.json");
        fs::write(&path, r#"{ "entries": { "userName": "ana" } }"#).unwrap();

        match JsonFileStorage::new(path).load() {
            Ok(store) => {
                assert_eq!(store.version, CURRENT_VERSION);
                assert_eq!(store.get("userName"), Some("ana"));
            }
            Err(e) => panic!("Expected successful load, got error: {:?}", e),
        }
    }

    #[test]
    fn test_load_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.json");
        fs::write(&path, r#"{ "version": 999, "entries": {} }"#).unwrap();

        match JsonFileStorage::new(path).load() {
            Err(StorageError::FutureVersion(999)) => {}
            _ => panic!("Expected FutureVersion(999) error"),
        }
    }

    #[test]
    fn test_save_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        storage.save(&Store::default()).unwrap();
        storage.save(&Store::default()).unwrap();

        let leftovers = fs::read_dir(dir.path().join("registro"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_load_version_zero_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        fs::write(&path, r#"{ "version": 0, "entries": {} }"#).unwrap();

        assert!(matches!(
            JsonFileStorage::new(path).load(),
            Err(StorageError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn test_failed_save_removes_its_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        // A directory where the lock file should be makes the lock step fail.
        fs::create_dir_all(dir.path().join("registro").join("session.lock")).unwrap();

        assert!(matches!(
            storage.save(&Store::default()),
            Err(StorageError::SaveFailed { .. })
        ));

        let leftovers = fs::read_dir(dir.path().join("registro"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }
}

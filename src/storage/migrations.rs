use std::path::Path;

use serde_json::Value;

use crate::{models::store::CURRENT_VERSION, storage::StorageError};

/// Returns 1 if version field is missing (assumes v1, our first versioned schema)
pub fn detect_version(path: &Path, content: &str) -> Result<u32, StorageError> {
    let value: Value = serde_json::from_str(content).map_err(|e| StorageError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    match value.get("version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::InvalidVersion(v.to_string())),
        None => Ok(1),
    }
}

/// Only the current schema is readable; there is nothing older to upgrade from
pub fn check_version(version: u32) -> Result<(), StorageError> {
    if version > CURRENT_VERSION {
        Err(StorageError::FutureVersion(version))
    } else if version < CURRENT_VERSION {
        Err(StorageError::UnsupportedVersion(version))
    } else {
        Ok(())
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current schema version
pub const CURRENT_VERSION: u32 = 1;

/// Key-value document persisted on disk, the terminal counterpart of browser local storage
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub version: u32,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl Store {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

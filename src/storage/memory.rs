use std::cell::RefCell;

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

/// Volatile storage used where nothing should touch the disk
#[derive(Default)]
pub struct MemoryStorage {
    store: RefCell<Store>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Store::default();
        store.insert(key, value);
        Self {
            store: RefCell::new(store),
        }
    }

    /// Drops every entry, like a user wiping site data from outside the app
    pub fn wipe(&self) {
        *self.store.borrow_mut() = Store::default();
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Store, StorageError> {
        Ok(self.store.borrow().clone())
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        *self.store.borrow_mut() = store.clone();
        Ok(())
    }
}

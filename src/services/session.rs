use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::storage::{Storage, StorageError};

/// Key holding the identity marker
pub const USER_NAME_KEY: &str = "userName";
/// Key holding the instant of the last login
pub const LOGGED_IN_AT_KEY: &str = "loggedInAt";

/// The single identity marker, persisted through a [`Storage`] backend.
///
/// Every read goes to the backend, so changes made elsewhere (another
/// process, a wiped data directory) are seen on the next call.
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current user name, `None` when absent or empty
    pub fn get(&self) -> Result<Option<String>, StorageError> {
        let store = self.storage.load()?;
        Ok(store
            .get(USER_NAME_KEY)
            .filter(|value| !value.is_empty())
            .map(str::to_string))
    }

    pub fn set(&self, user_name: &str) -> Result<(), StorageError> {
        let mut store = self.storage.load()?;
        store.insert(USER_NAME_KEY, user_name);
        store.insert(LOGGED_IN_AT_KEY, Timestamp::now().to_string());
        self.storage.save(&store)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let mut store = self.storage.load()?;
        let removed_name = store.remove(USER_NAME_KEY);
        let removed_instant = store.remove(LOGGED_IN_AT_KEY);
        if removed_name.is_none() && removed_instant.is_none() {
            return Ok(());
        }
        self.storage.save(&store)
    }

    pub fn logged_in_at(&self) -> Result<Option<Timestamp>, StorageError> {
        let store = self.storage.load()?;
        Ok(store
            .get(LOGGED_IN_AT_KEY)
            .and_then(|value| value.parse().ok()))
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("User name cannot be blank")]
    BlankUserName,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct LoginParameters {
    pub user_name: String,
}

pub fn login<S: Storage>(
    session: &SessionStore<S>,
    parameters: LoginParameters,
) -> Result<String, LoginError> {
    let user_name = parameters.user_name.trim();
    if user_name.is_empty() {
        return Err(LoginError::BlankUserName);
    }

    session.set(user_name)?;
    info!(user_name, "logged in");

    Ok(user_name.to_string())
}

/// Returns the user that was logged out, if any
pub fn logout<S: Storage>(session: &SessionStore<S>) -> Result<Option<String>, StorageError> {
    let previous = session.get()?;
    session.clear()?;
    if let Some(user_name) = &previous {
        info!(user_name = user_name.as_str(), "logged out");
    }
    Ok(previous)
}

//! Access decision for protected views.
//!
//! This is a convenience for the user, not a security boundary: the service
//! never sees the session marker.

use tracing::{debug, warn};

use crate::{services::session::SessionStore, storage::Storage};

pub const LOGIN_PATH: &str = "/login";

/// Logical views of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Login,
    Registro,
    Resultados,
    Personas,
}

impl Destination {
    pub const ALL: [Destination; 5] = [
        Destination::Home,
        Destination::Login,
        Destination::Registro,
        Destination::Resultados,
        Destination::Personas,
    ];

    /// Command that opens this view
    pub fn command(&self) -> &'static str {
        match self {
            Destination::Home => "registro",
            Destination::Login => "registro login <name>",
            Destination::Registro => "registro register",
            Destination::Resultados => "registro results",
            Destination::Personas => "registro personas",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::Login => LOGIN_PATH,
            Destination::Registro => "/registro",
            Destination::Resultados => "/resultados",
            Destination::Personas => "/personas",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Destination::Registro | Destination::Resultados | Destination::Personas
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

/// Decides whether `destination` may be entered right now.
///
/// Reads the session on every call. An unreadable session store counts as
/// "not logged in".
pub fn can_enter<S: Storage>(destination: &str, session: &SessionStore<S>) -> Decision {
    let user_name = match session.get() {
        Ok(user_name) => user_name,
        Err(e) => {
            warn!(error = %e, "session could not be read");
            None
        }
    };

    match user_name {
        Some(_) => Decision::Allow,
        None => {
            debug!(destination, "no session, redirecting to login");
            Decision::Redirect(LOGIN_PATH.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::session::{LoginParameters, USER_NAME_KEY, login, logout},
        storage::{StorageError, memory::MemoryStorage},
    };
    use rstest::rstest;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn load(&self) -> Result<crate::models::store::Store, StorageError> {
            Err(StorageError::InvalidVersion(String::from("\"broken\"")))
        }

        fn save(&self, _store: &crate::models::store::Store) -> Result<(), StorageError> {
            Err(StorageError::InvalidVersion(String::from("\"broken\"")))
        }
    }

    fn redirect_to_login() -> Decision {
        Decision::Redirect(String::from("/login"))
    }

    #[rstest]
    #[case::registro("/registro")]
    #[case::resultados("/resultados")]
    #[case::unknown("/anything/else")]
    fn test_allows_any_destination_with_a_session(#[case] destination: &str) {
        let session = SessionStore::new(MemoryStorage::with_entry(USER_NAME_KEY, "testUser"));
        assert_eq!(can_enter(destination, &session), Decision::Allow);
    }

    #[rstest]
    #[case::registro("/registro")]
    #[case::resultados("/resultados")]
    #[case::personas("/personas")]
    fn test_redirects_every_destination_to_login_without_a_session(#[case] destination: &str) {
        let session = SessionStore::new(MemoryStorage::new());
        assert_eq!(can_enter(destination, &session), redirect_to_login());
    }

    #[test]
    fn test_treats_an_empty_marker_as_logged_out() {
        let session = SessionStore::new(MemoryStorage::with_entry(USER_NAME_KEY, ""));
        assert_eq!(can_enter("/registro", &session), redirect_to_login());
    }

    #[test]
    fn test_treats_an_unreadable_store_as_logged_out() {
        let session = SessionStore::new(BrokenStorage);
        assert_eq!(can_enter("/registro", &session), redirect_to_login());
    }

    #[test]
    fn test_repeated_checks_agree_while_the_session_is_unchanged() {
        let session = SessionStore::new(MemoryStorage::with_entry(USER_NAME_KEY, "testUser"));
        let first = can_enter("/registro", &session);
        let second = can_enter("/registro", &session);
        assert_eq!(first, second);
    }

    #[test]
    fn test_follows_the_session_across_login_and_logout() {
        let session = SessionStore::new(MemoryStorage::new());
        assert_eq!(can_enter("/registro", &session), redirect_to_login());

        login(
            &session,
            LoginParameters {
                user_name: String::from("ana"),
            },
        )
        .unwrap();
        assert_eq!(can_enter("/registro", &session), Decision::Allow);

        logout(&session).unwrap();
        assert_eq!(can_enter("/registro", &session), redirect_to_login());
    }

    #[test]
    fn test_sees_the_store_being_wiped_externally() {
        let session = SessionStore::new(MemoryStorage::with_entry(USER_NAME_KEY, "ana"));
        assert_eq!(can_enter("/resultados", &session), Decision::Allow);

        session.storage().wipe();
        assert_eq!(can_enter("/resultados", &session), redirect_to_login());
    }

    #[test]
    fn test_only_data_views_are_protected() {
        assert!(!Destination::Home.is_protected());
        assert!(!Destination::Login.is_protected());
        assert!(Destination::Registro.is_protected());
        assert!(Destination::Resultados.is_protected());
        assert_eq!(Destination::Login.path(), LOGIN_PATH);
    }
}

//! Current storefront user.
//!
//! At most one user is signed in per profile. The record is stored as JSON
//! under `currentUser`; absence means logged out.

use tracing::warn;

use elite_cards_core::store::keys;
use elite_cards_core::{KeyValueStore, SessionUser};

use crate::error::Result;

/// Read and write the signed-in user.
#[derive(Debug, Clone)]
pub struct UserSession<S> {
    store: S,
}

impl<S: KeyValueStore> UserSession<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The signed-in user, if any.
    ///
    /// An unreadable record is logged and treated as logged out.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.store
            .get_json::<SessionUser>(keys::CURRENT_USER)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Unreadable current user, treating as logged out");
                None
            })
    }

    /// Sign a user in, or sign out with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_current_user(&self, user: Option<&SessionUser>) -> Result<()> {
        match user {
            Some(user) => self.store.set_json(keys::CURRENT_USER, user)?,
            None => self.store.remove(keys::CURRENT_USER)?,
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elite_cards_core::MemoryStore;

    use super::*;

    #[test]
    fn test_logged_out_by_default() {
        let session = UserSession::new(MemoryStore::new());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = UserSession::new(MemoryStore::new());
        let user = SessionUser::new("ama@example.com", "Ama");

        session.set_current_user(Some(&user)).unwrap();
        assert_eq!(session.current_user(), Some(user));

        session.set_current_user(None).unwrap();
        assert!(session.current_user().is_none());
        assert!(session.store.get(keys::CURRENT_USER).unwrap().is_none());
    }

    #[test]
    fn test_malformed_user_is_logged_out() {
        let session = UserSession::new(MemoryStore::with_entries([(keys::CURRENT_USER, "{")]));
        assert!(session.current_user().is_none());
    }
}

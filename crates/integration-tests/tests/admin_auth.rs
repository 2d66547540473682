//! Integration tests for operator sessions.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;

use elite_cards_admin::AdminError;
use elite_cards_admin::auth::{AdminAuth, StaticCredentials};
use elite_cards_core::{KeyValueStore, MemoryStore};

fn auth(store: &Arc<MemoryStore>) -> AdminAuth<Arc<MemoryStore>, StaticCredentials> {
    AdminAuth::new(
        Arc::clone(store),
        StaticCredentials::new("ops@elitecards.test", SecretString::from("s3cret-pass")),
    )
}

#[test]
fn test_session_restored_by_new_instance() {
    let store = Arc::new(MemoryStore::new());

    let session = auth(&store).login("ops@elitecards.test", "s3cret-pass").unwrap();
    let restored = auth(&store).restore_session().unwrap();
    assert_eq!(restored, session);
    assert_eq!(restored.name, "Admin");
}

#[test]
fn test_rejected_login_stores_nothing() {
    let store = Arc::new(MemoryStore::new());

    let result = auth(&store).login("ops@elitecards.test", "guess");
    assert!(matches!(result, Err(AdminError::InvalidCredentials)));
    assert!(store.get("adminAuth").unwrap().is_none());
    assert!(auth(&store).restore_session().is_none());
}

#[test]
fn test_logout_ends_session_for_everyone() {
    let store = Arc::new(MemoryStore::new());
    auth(&store).login("ops@elitecards.test", "s3cret-pass").unwrap();

    auth(&store).logout().unwrap();
    assert!(auth(&store).restore_session().is_none());
}

#[test]
fn test_corrupt_session_is_discarded() {
    let store = Arc::new(MemoryStore::new());
    store.set("adminAuth", "{not json").unwrap();

    assert!(auth(&store).restore_session().is_none());
    assert!(store.get("adminAuth").unwrap().is_none());
}

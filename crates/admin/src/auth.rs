//! Operator login.
//!
//! There is exactly one operator. Credentials are checked through a
//! [`CredentialVerifier`]; the default verifier compares against the
//! configured pair. A successful login is persisted under `adminAuth` so it
//! survives a restart.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use elite_cards_core::KeyValueStore;
use elite_cards_core::store::{StoreError, keys};

use crate::config::AdminCredentials;
use crate::error::{AdminError, Result};

/// Display name recorded for the operator.
const ADMIN_NAME: &str = "Admin";

/// Checks an email/password pair.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Verifier holding a single fixed credential pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    email: String,
    password: SecretString,
}

impl StaticCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

impl From<AdminCredentials> for StaticCredentials {
    fn from(credentials: AdminCredentials) -> Self {
        Self::new(credentials.email, credentials.password)
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        AdminCredentials::default().into()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        email == self.email && password == self.password.expose_secret()
    }
}

/// A signed-in operator.
///
/// Only `email` is required when reading a stored session. A missing name
/// reads as `Admin`; a missing or unreadable login time reads as the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub email: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_login_time")]
    pub login_time: DateTime<Utc>,
}

fn default_name() -> String {
    ADMIN_NAME.to_string()
}

/// Accepts RFC 3339 text or epoch milliseconds.
fn lenient_login_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<DateTime<Utc>, D::Error> {
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

/// Login, logout and session restore over a key-value store.
#[derive(Debug, Clone)]
pub struct AdminAuth<S, V> {
    store: S,
    verifier: V,
}

impl<S: KeyValueStore, V: CredentialVerifier> AdminAuth<S, V> {
    #[must_use]
    pub const fn new(store: S, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// Verify the pair and persist a new session.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidCredentials` if the pair is rejected, or a
    /// storage error if the session cannot be persisted.
    pub fn login(&self, email: &str, password: &str) -> Result<AdminSession> {
        if !self.verifier.verify(email, password) {
            warn!(email = %email, "Admin login rejected");
            return Err(AdminError::InvalidCredentials);
        }

        let session = AdminSession {
            email: email.to_string(),
            name: ADMIN_NAME.to_string(),
            login_time: Utc::now(),
        };
        self.store.set_json(keys::ADMIN_AUTH, &session)?;
        info!(email = %email, "Admin logged in");
        Ok(session)
    }

    /// The persisted session, if any.
    ///
    /// A malformed record is logged and removed. A storage failure is logged
    /// and leaves the record in place.
    #[must_use]
    pub fn restore_session(&self) -> Option<AdminSession> {
        match self.store.get_json::<AdminSession>(keys::ADMIN_AUTH) {
            Ok(session) => session,
            Err(e @ StoreError::Malformed { .. }) => {
                warn!(error = %e, "Discarding unreadable admin session");
                if let Err(e) = self.store.remove(keys::ADMIN_AUTH) {
                    warn!(error = %e, "Failed to remove admin session");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read admin session");
                None
            }
        }
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session cannot be removed.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::ADMIN_AUTH)?;
        info!("Admin logged out");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elite_cards_core::MemoryStore;

    use super::*;

    fn auth() -> AdminAuth<MemoryStore, StaticCredentials> {
        AdminAuth::new(MemoryStore::new(), StaticCredentials::default())
    }

    #[test]
    fn test_login_persists_session() {
        let auth = auth();
        let session = auth.login("admin@elitecards.com", "admin123").unwrap();
        assert_eq!(session.name, "Admin");
        assert_eq!(auth.restore_session(), Some(session));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let auth = auth();
        let err = auth.login("admin@elitecards.com", "admin124").unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(auth.restore_session().is_none());
    }

    #[test]
    fn test_logout() {
        let auth = auth();
        auth.login("admin@elitecards.com", "admin123").unwrap();
        auth.logout().unwrap();
        assert!(auth.restore_session().is_none());
    }

    #[test]
    fn test_restores_browser_written_session() {
        let auth = AdminAuth::new(
            MemoryStore::with_entries([(
                keys::ADMIN_AUTH,
                r#"{"email":"admin@elitecards.com","name":"Admin","loginTime":"2024-06-01T09:30:00.000Z"}"#,
            )]),
            StaticCredentials::default(),
        );
        let session = auth.restore_session().unwrap();
        assert_eq!(session.login_time.to_rfc3339(), "2024-06-01T09:30:00+00:00");
    }

    #[test]
    fn test_partial_session_is_kept() {
        for raw in [
            r#"{"email":"admin@elitecards.com","name":"Admin"}"#,
            r#"{"email":"admin@elitecards.com","loginTime":"last tuesday"}"#,
            r#"{"email":"admin@elitecards.com","loginTime":null}"#,
        ] {
            let auth = AdminAuth::new(
                MemoryStore::with_entries([(keys::ADMIN_AUTH, raw)]),
                StaticCredentials::default(),
            );
            let session = auth.restore_session().unwrap();
            assert_eq!(session.email, "admin@elitecards.com");
            assert_eq!(session.name, "Admin");
            assert_eq!(session.login_time, DateTime::<Utc>::default());
            assert_eq!(auth.store.get(keys::ADMIN_AUTH).unwrap().as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_login_time_in_epoch_millis() {
        let session: AdminSession = serde_json::from_str(
            r#"{"email":"admin@elitecards.com","loginTime":1717234200000}"#,
        )
        .unwrap();
        assert_eq!(session.login_time.to_rfc3339(), "2024-06-01T09:30:00+00:00");
    }

    #[test]
    fn test_malformed_session_is_removed() {
        let auth = AdminAuth::new(
            MemoryStore::with_entries([(keys::ADMIN_AUTH, "{not json")]),
            StaticCredentials::default(),
        );
        assert!(auth.restore_session().is_none());
        assert!(auth.store.get(keys::ADMIN_AUTH).unwrap().is_none());
    }

    #[test]
    fn test_custom_verifier() {
        struct AllowAll;
        impl CredentialVerifier for AllowAll {
            fn verify(&self, _email: &str, _password: &str) -> bool {
                true
            }
        }

        let auth = AdminAuth::new(MemoryStore::new(), AllowAll);
        assert!(auth.login("ops@elitecards.com", "anything").is_ok());
    }
}

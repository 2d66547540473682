//! Storefront session user.

use serde::{Deserialize, Serialize};

/// The signed-in storefront user.
///
/// The record is opaque beyond `email` and `name`: any additional fields the
/// browser stored are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionUser {
    /// Create a user with no extra fields.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let json = r#"{"email":"kofi@example.com","name":"Kofi","phone":"0244000000"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.extra.get("phone").and_then(|v| v.as_str()), Some("0244000000"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["phone"], "0244000000");
    }
}

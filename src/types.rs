//! Core types for infrahub-client

use serde::{Deserialize, Serialize};

/// Username/password pair exchanged for an [`AccessToken`]
///
/// Used once per login and never stored by the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create a new credentials pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token returned by login
///
/// The client never caches, refreshes, or expires it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// One artifact resolved by a query
///
/// All three fields are required; a node lacking any of them fails to decode.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact node ID, used to download the payload
    pub id: String,
    /// ID of the stored payload object
    pub storage_id: String,
    /// Payload checksum reported by the service (MD5 hex)
    pub checksum: String,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn credentials_serialize_as_login_body() {
        let body = serde_json::to_value(Credentials::new("user", "pass")).unwrap();
        assert_eq!(body, serde_json::json!({"username": "user", "password": "pass"}));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("abc123");
        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn token_is_transparent_in_json() {
        let token: AccessToken = serde_json::from_str("\"t\"").unwrap();
        assert_eq!(token, AccessToken::from("t"));
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"t\"");
    }
}

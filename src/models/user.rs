// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and credential models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User profile as returned by the backend.
///
/// Snapshots are replaced wholesale, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (lower-cased by the backend)
    pub email: String,
    /// Account creation time (ISO 8601, as sent by the backend)
    pub created_at: String,
}

/// Access/refresh token pair, always stored and cleared together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived bearer token for API calls
    pub access_token: String,
    /// Long-lived token used only to mint new access tokens
    pub refresh_token: String,
}

impl CredentialPair {
    /// Build a pair, rejecting empty tokens.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, EmptyTokenError> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();

        if access_token.is_empty() {
            return Err(EmptyTokenError("access_token"));
        }
        if refresh_token.is_empty() {
            return Err(EmptyTokenError("refresh_token"));
        }

        Ok(Self {
            access_token,
            refresh_token,
        })
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// A credential pair was built with an empty token.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0} must not be empty")]
pub struct EmptyTokenError(pub &'static str);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_rejects_empty_tokens() {
        assert!(CredentialPair::new("", "refresh").is_err());
        assert!(CredentialPair::new("access", "").is_err());
        assert!(CredentialPair::new("access", "refresh").is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let pair = CredentialPair::new("secret-access", "secret-refresh").unwrap();
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }

    #[test]
    fn test_profile_from_backend_json() {
        let json = r#"{
            "id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "name": "Ada",
            "email": "ada@example.com",
            "created_at": "2024-01-01T10:00:00.123456"
        }"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }
}

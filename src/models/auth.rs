// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request and response bodies for the `/auth` endpoints.

use super::user::{CredentialPair, EmptyTokenError, UserProfile};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Minimum password length accepted by the backend.
const MIN_PASSWORD_LEN: usize = 6;

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

impl SignupRequest {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Successful signup/login response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AuthResponse {
    /// The credential pair carried by this response.
    pub fn credentials(&self) -> Result<CredentialPair, EmptyTokenError> {
        CredentialPair::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Successful refresh response.
///
/// The backend does not rotate refresh tokens today; one is picked up if sent.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let problem = if password.is_empty() {
        "Password is required"
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        "Password must be at least 6 characters"
    } else if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        "Password must contain at least one letter"
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        "Password must contain at least one number"
    } else {
        return Ok(());
    };

    Err(ValidationError::new("password").with_message(problem.into()))
}

/// Flatten validation errors into one message, ordered by field name.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

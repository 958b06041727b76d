// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with consistent classification of backend responses.

use reqwest::StatusCode;
use serde::Deserialize;

/// Error returned by every API operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("{error}: {message}")]
    Validation {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Credential storage error: {0}")]
    Storage(String),
}

/// JSON error body returned by the backend.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Whether this error is an HTTP 401 from the backend.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status carried by the error, if it came from a backend response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a non-success response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let reason = status.canonical_reason().unwrap_or("Request failed");
        let message = parsed
            .message
            .clone()
            .or_else(|| parsed.error.clone())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    reason.to_string()
                } else {
                    body.trim().to_string()
                }
            });

        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized { message };
        }

        if status.is_client_error() {
            return ApiError::Validation {
                status: status.as_u16(),
                error: parsed.error.unwrap_or_else(|| reason.to_string()),
                message,
            };
        }

        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_keeps_backend_message() {
        let err = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"Invalid or expired token","message":"Please login again"}"#,
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized: Please login again");
    }

    #[test]
    fn test_client_error_is_validation() {
        let err = ApiError::from_response(
            StatusCode::CONFLICT,
            r#"{"error":"Conflict","message":"Email already registered"}"#,
        );
        match err {
            ApiError::Validation {
                status,
                error,
                message,
            } => {
                assert_eq!(status, 409);
                assert_eq!(error, "Conflict");
                assert_eq!(message, "Email already registered");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_server_error_with_plain_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_unauthorized());
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn test_empty_body_falls_back_to_reason() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, "");
        match err {
            ApiError::Validation { message, .. } => assert_eq!(message, "Not Found"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token interceptor with refresh-and-retry.
//!
//! Every request passes through two hooks:
//! - outbound: attach the stored access token
//! - inbound: on a 401 for a first attempt, refresh the access token once and
//!   resubmit the request through the whole pipeline
//!
//! Refreshes are single-flight: concurrent 401s wait for the refresh already
//! in progress and reuse its token instead of issuing their own. When a
//! refresh fails the stored credentials are cleared and the revocation hook,
//! if one is installed, is called.

use crate::error::ApiError;
use crate::models::{CredentialPair, RefreshRequest, RefreshResponse};
use crate::services::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::store::{StoreError, TokenKey, TokenStore};
use futures_util::future::{BoxFuture, FutureExt};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;

/// Refresh endpoint path.
const REFRESH_PATH: &str = "/auth/refresh";

/// One pass of a request through the pipeline.
///
/// A retry is a new descriptor derived from the first; descriptors are never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct Attempt {
    request: ApiRequest,
    retried: bool,
    refreshable: bool,
}

impl Attempt {
    /// The caller's original request.
    pub fn first(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
            refreshable: true,
        }
    }

    /// A request whose 401 is final, such as a credential exchange.
    pub fn once(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
            refreshable: false,
        }
    }

    /// The single permitted retry, carrying a fresh access token.
    pub fn retry_with(&self, access_token: &str) -> Self {
        let mut request = self.request.clone();
        request.set_bearer(access_token);
        Self {
            request,
            retried: true,
            refreshable: false,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn is_retry(&self) -> bool {
        self.retried
    }

    /// Whether a 401 on this attempt may trigger refresh-and-retry.
    pub fn can_refresh(&self) -> bool {
        self.refreshable
    }
}

/// Called after a failed refresh has cleared the stored credentials.
pub type RevocationHook = Box<dyn Fn() + Send + Sync>;

/// Why a refresh did not produce a usable access token.
#[derive(Debug, thiserror::Error)]
pub enum RefreshFailure {
    #[error("No refresh token stored")]
    MissingRefreshToken,

    #[error("Refresh rejected: {0}")]
    Rejected(#[source] ApiError),

    #[error("Refresh returned an empty access token")]
    EmptyAccessToken,

    #[error("Failed to persist refreshed credentials: {0}")]
    Storage(#[from] StoreError),
}

/// Auth interceptor pipeline in front of the HTTP transport.
pub struct AuthPipeline {
    transport: HttpTransport,
    store: Arc<dyn TokenStore>,
    /// Serializes refresh operations.
    refresh_lock: Mutex<()>,
    on_revoked: OnceLock<RevocationHook>,
}

impl AuthPipeline {
    pub fn new(transport: HttpTransport, store: Arc<dyn TokenStore>) -> Self {
        Self {
            transport,
            store,
            refresh_lock: Mutex::new(()),
            on_revoked: OnceLock::new(),
        }
    }

    /// Install the hook called when a failed refresh revokes the credentials.
    ///
    /// Only the first hook installed is kept.
    pub fn set_revocation_hook(&self, hook: RevocationHook) {
        if self.on_revoked.set(hook).is_err() {
            tracing::warn!("Revocation hook already installed, ignoring");
        }
    }

    /// Send a request through both hooks.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.dispatch(Attempt::first(request)).await
    }

    /// Send a request whose 401 goes straight back to the caller.
    ///
    /// Used for signup and login: a 401 there means bad credentials, and
    /// resubmitting would only spend the endpoint's rate limit.
    pub async fn send_once(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.dispatch(Attempt::once(request)).await
    }

    /// Outbound hook: attach the stored access token, if any.
    ///
    /// Without a stored token the request goes out as it came in.
    pub async fn authorize(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(token) = self.store.read(TokenKey::Access).await {
            request.set_bearer(&token);
        }
        request
    }

    fn dispatch(&self, attempt: Attempt) -> BoxFuture<'_, Result<ApiResponse, ApiError>> {
        async move {
            let request = self.authorize(attempt.request().clone()).await;
            let rejected_token = request.bearer().map(str::to_string);

            match self.transport.execute(&request).await {
                Err(err) if err.is_unauthorized() && attempt.can_refresh() => {
                    self.recover(attempt, rejected_token, err).await
                }
                other => other,
            }
        }
        .boxed()
    }

    /// Inbound hook for a first-attempt 401.
    async fn recover(
        &self,
        attempt: Attempt,
        rejected_token: Option<String>,
        original: ApiError,
    ) -> Result<ApiResponse, ApiError> {
        let path = attempt.request().path().to_string();

        match self.refresh(rejected_token.as_deref()).await {
            Ok(access_token) => {
                tracing::debug!(path = %path, "Retrying request with refreshed token");
                self.dispatch(attempt.retry_with(&access_token)).await
            }
            Err(failure) => {
                tracing::warn!(error = %failure, path = %path, "Token refresh failed");
                Err(original)
            }
        }
    }

    /// Obtain a fresh access token, sharing an in-flight refresh if there is one.
    ///
    /// `rejected_token` is the token the backend just refused. If the store
    /// holds a different one by the time the lock is acquired, another task
    /// already refreshed and its token is returned as is.
    pub async fn refresh(&self, rejected_token: Option<&str>) -> Result<String, RefreshFailure> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.store.read(TokenKey::Access).await {
            if rejected_token != Some(current.as_str()) {
                tracing::debug!("Access token already refreshed by another request");
                return Ok(current);
            }
        }

        let refresh_token = self
            .store
            .read(TokenKey::Refresh)
            .await
            .ok_or(RefreshFailure::MissingRefreshToken)?;

        match self.refresh_with(&refresh_token).await {
            Ok(access_token) => {
                tracing::info!("Access token refreshed");
                Ok(access_token)
            }
            Err(failure) => {
                if let Err(e) = self.store.clear().await {
                    tracing::warn!(error = %e, "Failed to clear credentials after refresh failure");
                }
                if let Some(hook) = self.on_revoked.get() {
                    hook();
                }
                Err(failure)
            }
        }
    }

    async fn refresh_with(&self, refresh_token: &str) -> Result<String, RefreshFailure> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest { refresh_token })
            .map_err(RefreshFailure::Rejected)?;

        // Straight to the transport: the refresh call must not pass through
        // the hooks, or a 401 here would recurse.
        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(RefreshFailure::Rejected)?;
        let body: RefreshResponse = response.json().map_err(RefreshFailure::Rejected)?;

        if body.access_token.is_empty() {
            return Err(RefreshFailure::EmptyAccessToken);
        }

        // Prefer a rotated token; otherwise keep whatever is stored now, which
        // may differ from what was sent.
        let next_refresh = match body.refresh_token.filter(|t| !t.is_empty()) {
            Some(rotated) => rotated,
            None => self
                .store
                .read(TokenKey::Refresh)
                .await
                .unwrap_or_else(|| refresh_token.to_string()),
        };

        let pair = CredentialPair::new(body.access_token, next_refresh)
            .map_err(|_| RefreshFailure::EmptyAccessToken)?;
        self.store.write(&pair).await?;

        Ok(pair.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_descriptor_is_derived_not_mutated() {
        let mut request = ApiRequest::get("/dashboard");
        request.set_bearer("old");
        let first = Attempt::first(request);

        let retry = first.retry_with("new");

        assert!(!first.is_retry());
        assert!(first.can_refresh());
        assert_eq!(first.request().bearer(), Some("old"));
        assert!(retry.is_retry());
        assert!(!retry.can_refresh());
        assert_eq!(retry.request().bearer(), Some("new"));
        assert_eq!(retry.request().path(), "/dashboard");
    }

    #[test]
    fn test_single_shot_attempt_never_refreshes() {
        let attempt = Attempt::once(ApiRequest::post("/auth/login"));
        assert!(!attempt.is_retry());
        assert!(!attempt.can_refresh());
    }
}

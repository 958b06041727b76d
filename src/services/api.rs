// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed operations on the video API.
//!
//! Every call goes through the [`AuthPipeline`], so bearer tokens and
//! refresh-on-401 are handled here for free. Signup and login also persist
//! the returned credential pair before handing the payload back.

use crate::error::ApiError;
use crate::middleware::AuthPipeline;
use crate::models::auth::describe_validation_errors;
use crate::models::{
    AuthResponse, Dashboard, HealthResponse, LoginRequest, ProfileResponse, SignupRequest,
    StreamResponse, UserProfile, WatchEvent,
};
use crate::services::transport::ApiRequest;
use crate::store::TokenStore;
use crate::time_utils::format_utc_rfc3339;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use validator::Validate;

/// Video API client.
#[derive(Clone)]
pub struct ApiClient {
    pipeline: Arc<AuthPipeline>,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(pipeline: Arc<AuthPipeline>, store: Arc<dyn TokenStore>) -> Self {
        Self { pipeline, store }
    }

    // ─── Auth ────────────────────────────────────────────────────────────────

    /// Register a new account and store its credentials.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = SignupRequest::new(name, email, password);
        body.validate()
            .map_err(|e| ApiError::InvalidInput(describe_validation_errors(&e)))?;

        let request = ApiRequest::post("/auth/signup").json(&body)?;
        self.authenticate(request).await
    }

    /// Log in and store the returned credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest::new(email, password);
        body.validate()
            .map_err(|e| ApiError::InvalidInput(describe_validation_errors(&e)))?;

        let request = ApiRequest::post("/auth/login").json(&body)?;
        self.authenticate(request).await
    }

    /// Shared tail of signup/login: parse, then persist the pair.
    ///
    /// A 401 here is a credential rejection, never an expired session, so it
    /// is returned without a refresh attempt.
    async fn authenticate(&self, request: ApiRequest) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self.pipeline.send_once(request).await?.json()?;

        let credentials = auth
            .credentials()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.store
            .write(&credentials)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        tracing::info!(user_id = %auth.user.id, "Credentials stored");
        Ok(auth)
    }

    /// Get the authenticated user's profile.
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let response: ProfileResponse = self
            .pipeline
            .send(ApiRequest::get("/auth/me"))
            .await?
            .json()?;
        Ok(response.user)
    }

    /// Invalidate the current access token on the backend.
    ///
    /// Local credentials are left alone; see `SessionManager::logout`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.pipeline.send(ApiRequest::post("/auth/logout")).await?;
        Ok(())
    }

    // ─── Videos ──────────────────────────────────────────────────────────────

    /// Get the videos shown on the dashboard, each with its playback token.
    pub async fn get_dashboard(&self) -> Result<Dashboard, ApiError> {
        self.pipeline
            .send(ApiRequest::get("/dashboard"))
            .await?
            .json()
    }

    /// Exchange a playback token for the stream details of one video.
    ///
    /// The playback token is passed through untouched; only the backend
    /// decides whether it is valid for this video.
    pub async fn get_stream_url(
        &self,
        video_id: &str,
        playback_token: &str,
    ) -> Result<StreamResponse, ApiError> {
        let request = ApiRequest::get(format!("{}/stream", video_path(video_id)))
            .query("token", playback_token);
        let stream: StreamResponse = self.pipeline.send(request).await?.json()?;

        if stream.is_expired_at(Utc::now()) {
            tracing::warn!(
                video_id = %stream.video_id,
                expires_at = stream.expires_at,
                "Stream URL already expired on arrival, check the local clock"
            );
        } else if let Some(expiry) = stream.expires_at_utc() {
            tracing::debug!(
                video_id = %stream.video_id,
                expires_at = %format_utc_rfc3339(expiry),
                "Stream URL issued"
            );
        }
        Ok(stream)
    }

    /// Record a watch event.
    pub async fn track_watch(&self, video_id: &str, event: WatchEvent) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("{}/track", video_path(video_id))).json(&event)?;
        self.pipeline.send(request).await?;
        Ok(())
    }

    /// Record a watch event without waiting for it.
    ///
    /// Best-effort: tracking is not critical, so failures are logged and
    /// dropped. The task runs to completion even if the caller goes away.
    pub fn track_watch_detached(&self, video_id: &str, event: WatchEvent) -> JoinHandle<()> {
        let client = self.clone();
        let video_id = video_id.to_string();

        tokio::spawn(async move {
            if let Err(e) = client.track_watch(&video_id, event).await {
                tracing::warn!(error = %e, video_id = %video_id, "Watch tracking failed (ignored)");
            }
        })
    }

    // ─── Misc ────────────────────────────────────────────────────────────────

    /// Backend liveness probe.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.pipeline.send(ApiRequest::get("/health")).await?.json()
    }
}

fn video_path(video_id: &str) -> String {
    format!("/video/{}", urlencoding::encode(video_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_is_path_encoded() {
        assert_eq!(video_path("abc123"), "/video/abc123");
        assert_eq!(video_path("a/b c"), "/video/a%2Fb%20c");
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use video_client::config::ClientConfig;
use video_client::models::CredentialPair;
use video_client::store::{MemoryTokenStore, StoreError, TokenKey, TokenStore};
use video_client::AppContext;
use wiremock::MockServer;

/// Token store that counts clears and can be told to fail writes.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryTokenStore,
    fail_writes: AtomicBool,
    clears: AtomicUsize,
}

impl RecordingStore {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryTokenStore::with_credentials(pair(access, refresh)),
            ..Default::default()
        })
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub async fn access(&self) -> Option<String> {
        self.inner.read(TokenKey::Access).await
    }

    pub async fn refresh(&self) -> Option<String> {
        self.inner.read(TokenKey::Refresh).await
    }
}

#[async_trait]
impl TokenStore for RecordingStore {
    async fn read(&self, key: TokenKey) -> Option<String> {
        self.inner.read(key).await
    }

    async fn write(&self, credentials: &CredentialPair) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.write(credentials).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear().await
    }
}

pub fn pair(access: &str, refresh: &str) -> CredentialPair {
    CredentialPair::new(access, refresh).expect("non-empty tokens")
}

/// Client config pointed at the mock backend, with a short timeout.
pub fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default().with_base_url(&server.uri());
    config.timeout = Duration::from_millis(500);
    config
}

/// Build a context against the mock backend.
pub fn test_context(server: &MockServer, store: Arc<RecordingStore>) -> AppContext {
    AppContext::new(test_config(server), store).expect("Failed to build context")
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": "65a1f0c2e4b0a1b2c3d4e5f6",
        "name": "Test User",
        "email": email,
        "created_at": "2024-01-01T10:00:00.000000"
    })
}

/// Body of a successful signup/login.
pub fn auth_json(email: &str, access: &str, refresh: &str) -> Value {
    json!({
        "message": "Login successful",
        "user": user_json(email),
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "Bearer",
        "expires_in": 900
    })
}

pub fn dashboard_json() -> Value {
    json!({
        "videos": [
            {
                "id": "vid-1",
                "title": "Getting Started",
                "description": "Intro",
                "thumbnail_url": "https://img.example.com/1.jpg",
                "created_at": "2024-01-01T10:00:00",
                "playback_token": "pb-1"
            },
            {
                "id": "vid-2",
                "title": "Advanced",
                "description": "Deep dive",
                "thumbnail_url": "https://img.example.com/2.jpg",
                "created_at": "2024-01-02T10:00:00",
                "playback_token": "pb-2"
            }
        ],
        "count": 2
    })
}

pub fn unauthorized_json() -> Value {
    json!({
        "error": "Invalid or expired token",
        "message": "Please login again"
    })
}

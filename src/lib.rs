// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video-Client: authenticated client for the video platform API
//!
//! This crate attaches bearer tokens to API calls, refreshes them
//! transparently when the backend answers 401, and tracks who is logged in.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod store;
pub mod time_utils;

use config::ClientConfig;
use error::ApiError;
use middleware::AuthPipeline;
use services::{ApiClient, HttpTransport};
use session::SessionManager;
use std::sync::Arc;
use store::{FileTokenStore, TokenStore};

/// Everything the client needs, built once at startup and passed by reference.
pub struct AppContext {
    pub config: ClientConfig,
    pub store: Arc<dyn TokenStore>,
    pub api: ApiClient,
    pub session: SessionManager,
}

impl AppContext {
    /// Wire up the client with the given token store.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config)?;
        let pipeline = Arc::new(AuthPipeline::new(transport, store.clone()));
        let api = ApiClient::new(Arc::clone(&pipeline), store.clone());
        let session = SessionManager::new(api.clone(), store.clone());
        pipeline.set_revocation_hook(session.revocation_hook());

        Ok(Self {
            config,
            store,
            api,
            session,
        })
    }

    /// Wire up the client with credentials persisted at `config.token_store_path`.
    pub fn with_file_store(config: ClientConfig) -> Result<Self, ApiError> {
        let store = Arc::new(FileTokenStore::new(config.token_store_path.clone()));
        Self::new(config, store)
    }
}

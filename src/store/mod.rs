// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Secure token storage.
//!
//! The rest of the crate only talks to [`TokenStore`]; platform keychains can
//! be plugged in by implementing it.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::models::CredentialPair;
use async_trait::async_trait;

/// Which of the two stored secrets to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKey {
    Access,
    Refresh,
}

/// Persistent storage for the credential pair.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read one token. Storage failures are reported as `None`, never as errors.
    async fn read(&self, key: TokenKey) -> Option<String>;

    /// Replace both tokens. Must be durable before returning `Ok`.
    async fn write(&self, credentials: &CredentialPair) -> Result<(), StoreError>;

    /// Remove both tokens. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Token storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process token store (nothing survives a restart).

use super::{StoreError, TokenKey, TokenStore};
use crate::models::CredentialPair;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Token store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credentials: RwLock<Option<CredentialPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a pair.
    pub fn with_credentials(credentials: CredentialPair) -> Self {
        Self {
            credentials: RwLock::new(Some(credentials)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self, key: TokenKey) -> Option<String> {
        let guard = self.credentials.read().await;
        guard.as_ref().map(|pair| match key {
            TokenKey::Access => pair.access_token.clone(),
            TokenKey::Refresh => pair.refresh_token.clone(),
        })
    }

    async fn write(&self, credentials: &CredentialPair) -> Result<(), StoreError> {
        *self.credentials.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.credentials.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.read(TokenKey::Access).await, None);

        let pair = CredentialPair::new("a", "b").unwrap();
        store.write(&pair).await.unwrap();
        assert_eq!(store.read(TokenKey::Access).await.as_deref(), Some("a"));
        assert_eq!(store.read(TokenKey::Refresh).await.as_deref(), Some("b"));

        store.clear().await.unwrap();
        assert_eq!(store.read(TokenKey::Access).await, None);
        assert_eq!(store.read(TokenKey::Refresh).await, None);

        // Idempotent
        store.clear().await.unwrap();
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed token store.
//!
//! Stores the credential pair as JSON with owner-only permissions (0600).
//! Each write goes to its own uniquely named temp file in the same directory,
//! which is then renamed over the target. Concurrent writers never share a
//! temp file, so a reader sees either the previous pair or a new one.

use super::{StoreError, TokenKey, TokenStore};
use crate::models::CredentialPair;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

/// Token store persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn read(&self, key: TokenKey) -> Option<String> {
        match self.load().await {
            Ok(pair) => pair.map(|pair| match key {
                TokenKey::Access => pair.access_token,
                TokenKey::Refresh => pair.refresh_token,
            }),
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    path = %self.path.display(),
                    "Token store read failed, treating as empty"
                );
                None
            }
        }
    }

    async fn write(&self, credentials: &CredentialPair) -> Result<(), StoreError> {
        let contents = serde_json::to_vec(credentials)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &contents))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `contents` to a fresh temp file next to `path`, then rename it over `path`.
fn replace_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;

    temp.persist(path)?;
    Ok(())
}

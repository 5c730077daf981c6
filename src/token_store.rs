// ABOUTME: Secure token storage port with in-memory and file-backed adapters
// ABOUTME: Owns persistence of the access/refresh token pair consumed by the session client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Token storage
//!
//! The session client never persists credentials itself; it reads and writes
//! them through the [`TokenStore`] port. Host applications are expected to
//! bind this to their platform keychain. Two adapters ship with the crate:
//! [`MemoryTokenStore`] for tests and ephemeral sessions, and
//! [`FileTokenStore`] for CLI or demo hosts without a keychain binding.
//!
//! A missing token is `Ok(None)`, never an error. Storage I/O failures are
//! normalized like any other non-HTTP failure so callers still see a single
//! error shape.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use crate::errors::{ApiError, ApiResult};

/// The two named tokens the client works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived bearer credential attached to every authenticated request
    Access,
    /// Longer-lived credential used only against the refresh endpoint
    Refresh,
}

impl TokenKind {
    /// Storage key name for this token
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

/// Async key-value port over the host's secure credential storage
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read a stored token, `None` if absent
    ///
    /// # Errors
    /// Returns an error if the underlying storage fails
    async fn get_token(&self, kind: TokenKind) -> ApiResult<Option<String>>;

    /// Persist a token value
    ///
    /// # Errors
    /// Returns an error if the underlying storage fails
    async fn set_token(&self, kind: TokenKind, value: &str) -> ApiResult<()>;

    /// Remove both stored tokens
    ///
    /// # Errors
    /// Returns an error if the underlying storage fails
    async fn clear_tokens(&self) -> ApiResult<()>;
}

/// In-memory token store
///
/// Suitable for tests and short-lived sessions; contents are lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self, kind: TokenKind) -> ApiResult<Option<String>> {
        Ok(self.tokens.read().await.get(&kind).cloned())
    }

    async fn set_token(&self, kind: TokenKind, value: &str) -> ApiResult<()> {
        self.tokens.write().await.insert(kind, value.to_owned());
        Ok(())
    }

    async fn clear_tokens(&self) -> ApiResult<()> {
        self.tokens.write().await.clear();
        Ok(())
    }
}

/// On-disk representation of the stored token pair
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl StoredTokens {
    fn get(&self, kind: TokenKind) -> Option<&String> {
        match kind {
            TokenKind::Access => self.access_token.as_ref(),
            TokenKind::Refresh => self.refresh_token.as_ref(),
        }
    }

    fn set(&mut self, kind: TokenKind, value: String) {
        match kind {
            TokenKind::Access => self.access_token = Some(value),
            TokenKind::Refresh => self.refresh_token = Some(value),
        }
    }
}

/// File-backed token store
///
/// Tokens are kept as a small JSON document. Reads of a missing file yield
/// `None`; writes create parent directories as needed. Access is serialized
/// through an internal lock so interleaved read-modify-write cycles from
/// concurrent refreshes cannot corrupt the file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    /// Create a store backed by the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Default token file under the platform config directory
    ///
    /// Falls back to a relative path when the platform exposes no config
    /// directory (some containerized environments).
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("forma")
            .join("tokens.json")
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ApiResult<StoredTokens> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::network(format!("Corrupt token file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(ApiError::network(format!("Failed to read token file: {e}"))),
        }
    }

    async fn save(&self, tokens: &StoredTokens) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::network(format!("Failed to create token dir: {e}")))?;
        }
        let bytes = serde_json::to_vec_pretty(tokens)
            .map_err(|e| ApiError::network(format!("Failed to encode tokens: {e}")))?;
        fs::write(&self.path, bytes)
            .await
            .map_err(|e| ApiError::network(format!("Failed to write token file: {e}")))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get_token(&self, kind: TokenKind) -> ApiResult<Option<String>> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.get(kind).cloned())
    }

    async fn set_token(&self, kind: TokenKind, value: &str) -> ApiResult<()> {
        let _guard = self.lock.write().await;
        let mut tokens = self.load().await?;
        tokens.set(kind, value.to_owned());
        self.save(&tokens).await
    }

    async fn clear_tokens(&self) -> ApiResult<()> {
        let _guard = self.lock.write().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::network(format!(
                "Failed to remove token file: {e}"
            ))),
        }
    }
}

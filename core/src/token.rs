//! Bearer token handling and the token store seam.
//!
//! The platform's secure storage is an external collaborator; `TokenStore`
//! is its boundary. `MemoryTokenStore` backs tests and hosts that do not
//! persist credentials.

use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An opaque credential. Never parsed, never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header only.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Bearer <token>` header value.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken([REDACTED])")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED TOKEN]")
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store unavailable: {0}")]
    Unavailable(String),
}

/// Secure storage for the single session token.
pub trait TokenStore: Send + Sync {
    /// Insert or replace the stored token.
    fn save(&self, token: &BearerToken) -> Result<(), TokenStoreError>;

    fn retrieve(&self) -> Option<BearerToken>;

    /// Remove the stored token. Succeeds when nothing is stored.
    fn delete(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<BearerToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: BearerToken) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &BearerToken) -> Result<(), TokenStoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| TokenStoreError::Unavailable(e.to_string()))?;
        *slot = Some(token.clone());
        Ok(())
    }

    fn retrieve(&self) -> Option<BearerToken> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    fn delete(&self) -> Result<(), TokenStoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| TokenStoreError::Unavailable(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

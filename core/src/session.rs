//! Credential storage.
//!
//! # Design
//! The bearer token lives behind `CredentialStore` and is reached through a
//! `Session` handle handed to `ApiClient` at construction. Nothing global:
//! two clients with two sessions never see each other's token, which keeps
//! tests independent.

use std::sync::{Arc, RwLock};

use crate::error::ApiError;

/// Persistence for a single bearer token.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, ApiError>;
    fn save(&self, token: &str) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Process-local store; forgets the token when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        let token = self
            .token
            .read()
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(token.clone())
    }

    fn save(&self, token: &str) -> Result<(), ApiError> {
        let mut slot = self
            .token
            .write()
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut slot = self
            .token
            .write()
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Cloneable handle to the active credential.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The stored token. Empty values count as absent.
    pub fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.load()?.filter(|token| !token.trim().is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<(), ApiError> {
        self.store.save(token)
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        self.store.clear()
    }

    /// Storage failures read as signed out.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// A registration that is waiting for its OTP.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PendingRegistration {
    pub email: String,
    pub phone: String,
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 15/5/25
******************************************************************************/
use crate::constants::TOKEN_STORAGE_KEY;
use crate::error::AppError;
use crate::storage::secure::SecureStorage;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Holds the single bearer token of the signed-in user.
///
/// The token is opaque: no format validation happens here.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SecureStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn SecureStorage>) -> Self {
        Self { storage }
    }

    /// Current token, if any. A storage failure reads as "no token".
    pub fn get(&self) -> Option<String> {
        match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to read token from {} storage: {}", self.storage.name(), e);
                None
            }
        }
    }

    /// Stores `token`, or deletes the stored token when `None`.
    pub fn set(&self, token: Option<&str>) -> Result<(), AppError> {
        self.storage.set(TOKEN_STORAGE_KEY, token)?;
        debug!(
            "Token {} in {} storage",
            if token.is_some() { "stored" } else { "deleted" },
            self.storage.name()
        );
        Ok(())
    }

    /// Current token, or [`AppError::InvalidRequest`] when signed out.
    pub fn require(&self) -> Result<String, AppError> {
        self.get().ok_or(AppError::InvalidRequest)
    }

    pub fn is_authorized(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("storage", &self.storage.name())
            .field("token", &self.get().map(|_| "[REDACTED]"))
            .finish()
    }
}

use crate::error::AppError;

/// Turns an authorization code into a stored access token.
#[async_trait::async_trait]
pub trait OAuthAuthenticator: Send + Sync {
    async fn fetch_oauth_token(&self, code: &str) -> Result<String, AppError>;
}

/// Login state the embedded browser keeps outside the token store.
#[async_trait::async_trait]
pub trait BrowserDataStore: Send + Sync {
    /// Removes every stored HTTP cookie.
    async fn clear_cookies(&self) -> Result<(), AppError>;

    /// Removes persisted site data (cached login session) for `domain`.
    async fn clear_site_data(&self, domain: &str) -> Result<(), AppError>;
}

/// For hosts without an embedded browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBrowserData;

#[async_trait::async_trait]
impl BrowserDataStore for NoBrowserData {
    async fn clear_cookies(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn clear_site_data(&self, _domain: &str) -> Result<(), AppError> {
        Ok(())
    }
}

use crate::config::Config;
use crate::constants::NATIVE_REDIRECT_PATH;
use crate::error::AppError;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Builds the authorization page URL and recognises the redirect that carries the code.
#[derive(Debug, Clone)]
pub struct AuthHelper {
    config: Arc<Config>,
}

impl AuthHelper {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Authorization page the user signs in on.
    ///
    /// Scopes configured as `a+b+c` are sent space separated, which the form
    /// encoding renders back as `a+b+c`.
    pub fn auth_url(&self) -> Result<Url, AppError> {
        let credentials = &self.config.credentials;
        let scope = credentials.access_scope.replace('+', " ");
        let url = Url::parse_with_params(
            &self.config.auth.authorize_url,
            &[
                ("client_id", credentials.access_key.as_str()),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Authorization code carried by a navigation to the native redirect path, if any.
    pub fn code_from_url(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        if url.path() != NATIVE_REDIRECT_PATH {
            return None;
        }
        let code = url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned());
        if code.is_some() {
            debug!("Authorization code received");
        }
        code
    }
}

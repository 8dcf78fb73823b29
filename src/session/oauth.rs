/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/5/25
******************************************************************************/
use crate::application::models::token::OAuthTokenResponseBody;
use crate::config::Config;
use crate::constants::GRANT_TYPE_AUTHORIZATION_CODE;
use crate::error::AppError;
use crate::session::interface::OAuthAuthenticator;
use crate::storage::TokenStore;
use crate::transport::{ApiRequest, GatePolicy, HttpClient, RequestGate};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Exchanges authorization codes for access tokens.
///
/// At most one exchange is outstanding. Repeating the in-flight code fails
/// with [`AppError::RequestInProgress`]; a different code cancels the stale
/// exchange, whose result is then never stored.
pub struct OAuth2Service<T: HttpClient> {
    config: Arc<Config>,
    client: Arc<T>,
    token_store: TokenStore,
    gate: RequestGate<String>,
}

impl<T: HttpClient> OAuth2Service<T> {
    pub fn new(config: Arc<Config>, client: Arc<T>, token_store: TokenStore) -> Self {
        Self {
            config,
            client,
            token_store,
            gate: RequestGate::new(),
        }
    }

    /// Token-exchange request for `code`.
    pub fn make_oauth_token_request(&self, code: &str) -> Result<ApiRequest, AppError> {
        let credentials = &self.config.credentials;
        let request = ApiRequest::post(&self.config.auth.token_url)
            .query("client_id", &credentials.access_key)
            .query("client_secret", &credentials.secret_key)
            .query("redirect_uri", &credentials.redirect_uri)
            .query("code", code)
            .query("grant_type", GRANT_TYPE_AUTHORIZATION_CODE);
        request.to_url()?;
        Ok(request)
    }

    pub fn is_exchanging(&self) -> bool {
        self.gate.is_active()
    }

    /// Runs the exchange and returns the full token response.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokenResponseBody, AppError> {
        let mut ticket = self.gate.acquire(code.to_string(), GatePolicy::RejectSame)?;
        let request = self.make_oauth_token_request(code)?;

        info!("Exchanging authorization code for an access token");
        let response: OAuthTokenResponseBody =
            match ticket.run(self.client.request(request)).await {
                Ok(response) => response,
                Err(AppError::Cancelled) => {
                    debug!("Token exchange superseded by a newer code");
                    return Err(AppError::Cancelled);
                }
                Err(e) => {
                    warn!("Token exchange failed: {}", e);
                    return Err(e);
                }
            };

        ticket.commit(|| self.token_store.set(Some(&response.access_token)))??;
        drop(ticket);

        debug!(
            "Token stored (type {}, scope {})",
            response.token_type, response.scope
        );
        Ok(response)
    }
}

#[async_trait::async_trait]
impl<T: HttpClient + 'static> OAuthAuthenticator for OAuth2Service<T> {
    async fn fetch_oauth_token(&self, code: &str) -> Result<String, AppError> {
        self.exchange_code(code)
            .await
            .map(|response| response.access_token)
    }
}

impl<T: HttpClient> fmt::Debug for OAuth2Service<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Service")
            .field("token_url", &self.config.auth.token_url)
            .field("exchanging", &self.is_exchanging())
            .finish()
    }
}

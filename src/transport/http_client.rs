use crate::config::RestApiConfig;
use crate::constants::AUTHORIZATION_HEADER_KEY;
use crate::error::AppError;
use crate::transport::request::ApiRequest;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Seam between the services and the network.
///
/// Implementations only move bytes; decoding into API records goes through
/// [`HttpClient::request`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues the request and returns the body of a 2xx response.
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, AppError>;

    /// Issues the request and decodes the JSON body into `T`.
    async fn request<T>(&self, request: ApiRequest) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to deserialize response body: {}", e);
            AppError::Json(e)
        })
    }
}

/// [`HttpClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a client whose requests time out after `config.timeout` seconds.
    pub fn new(config: &RestApiConfig) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.timeout);
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            AppError::Transport(e)
        })?;

        Ok(Self { client, timeout })
    }

    async fn handle_response(response: Response) -> Result<Vec<u8>, AppError> {
        let status = response.status();
        debug!("Response Status: {}", status);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable: {e}>"),
            };
            error!("API request failed. Status: {}, Body: {}", status, body);
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response body: {}", e);
            AppError::Transport(e)
        })?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[instrument(skip(self))]
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, AppError> {
        let url = request.to_url()?;
        debug!("Sending {} request to {}", request.method, request.url);

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(value) = request.authorization_header() {
            builder = builder.header(AUTHORIZATION_HEADER_KEY, value);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to send {} request: {}", request.method, e);
                return Err(AppError::Transport(e));
            }
        };

        Self::handle_response(response).await
    }
}

impl fmt::Display for ReqwestHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"timeout\":{}}}", self.timeout.as_secs())
    }
}

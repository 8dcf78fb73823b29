use crate::constants::BEARER_PREFIX;
use crate::error::AppError;
use reqwest::Method;
use std::fmt;
use url::Url;

/// Query keys whose values must never reach a log line.
const SENSITIVE_QUERY_KEYS: [&str; 2] = ["client_secret", "code"];

/// A transport-agnostic description of one API call.
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Value for the `Authorization` header, when the call is authenticated.
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer
            .as_ref()
            .map(|token| format!("{} {}", BEARER_PREFIX, token))
    }

    /// Resolves the target URL with the query parameters applied.
    ///
    /// A URL that does not parse is reported as [`AppError::InvalidRequest`].
    pub fn to_url(&self) -> Result<Url, AppError> {
        let url = if self.query.is_empty() {
            Url::parse(&self.url)?
        } else {
            Url::parse_with_params(&self.url, &self.query)?
        };
        Ok(url)
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(k, v)| {
                if SENSITIVE_QUERY_KEYS.contains(&k.as_str()) {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &query)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

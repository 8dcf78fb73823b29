use crate::constants::{DEFAULT_ORDER_BY, DEFAULT_PER_PAGE, DEFAULT_REST_TIMEOUT};
use crate::error::AppError;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;
use url::Url;

/// OAuth application credentials registered with the photo-hosting provider.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub redirect_uri: String,
    pub access_scope: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthEndpoints {
    pub authorize_url: String,
    pub token_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub per_page: u32,
    pub order_by: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub token_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: OAuthCredentials,
    pub auth: AuthEndpoints,
    pub rest_api: RestApiConfig,
    pub feed: FeedConfig,
    pub storage: StorageConfig,
}

impl fmt::Display for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"access_key\":\"{}\",\"secret_key\":\"[REDACTED]\",\"redirect_uri\":\"{}\",\"access_scope\":\"{}\"}}",
            self.access_key, self.redirect_uri, self.access_scope
        )
    }
}

impl fmt::Display for AuthEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"authorize_url\":\"{}\",\"token_url\":\"{}\"}}",
            self.authorize_url, self.token_url
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"per_page\":{},\"order_by\":\"{}\"}}",
            self.per_page, self.order_by
        )
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"token_file\":\"{}\"}}", self.token_file)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"credentials\":{},\"auth\":{},\"rest_api\":{},\"feed\":{},\"storage\":{}}}",
            self.credentials, self.auth, self.rest_api, self.feed, self.storage
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: OAuthCredentials {
                access_key: get_env_or_default(
                    "PHOTO_ACCESS_KEY",
                    String::from("default_access_key"),
                ),
                secret_key: get_env_or_default(
                    "PHOTO_SECRET_KEY",
                    String::from("default_secret_key"),
                ),
                redirect_uri: get_env_or_default(
                    "PHOTO_REDIRECT_URI",
                    String::from("urn:ietf:wg:oauth:2.0:oob"),
                ),
                access_scope: get_env_or_default(
                    "PHOTO_ACCESS_SCOPE",
                    String::from("public+read_user+write_likes"),
                ),
            },
            auth: AuthEndpoints {
                authorize_url: get_env_or_default(
                    "PHOTO_AUTHORIZE_URL",
                    String::from("https://unsplash.com/oauth/authorize"),
                ),
                token_url: get_env_or_default(
                    "PHOTO_TOKEN_URL",
                    String::from("https://unsplash.com/oauth/token"),
                ),
            },
            rest_api: RestApiConfig {
                base_url: get_env_or_default(
                    "PHOTO_REST_BASE_URL",
                    String::from("https://api.unsplash.com"),
                ),
                timeout: get_env_or_default("PHOTO_REST_TIMEOUT", DEFAULT_REST_TIMEOUT),
            },
            feed: FeedConfig {
                per_page: get_env_or_default("PHOTO_FEED_PER_PAGE", DEFAULT_PER_PAGE),
                order_by: DEFAULT_ORDER_BY.to_string(),
            },
            storage: StorageConfig {
                token_file: get_env_or_default(
                    "PHOTO_TOKEN_FILE",
                    String::from("photo_feed_token.json"),
                ),
            },
        }
    }

    /// Appends percent-encoded path segments to the REST base URL.
    pub fn rest_url_for(&self, segments: &[&str]) -> Result<String, AppError> {
        let mut url = Url::parse(&self.rest_api.base_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidRequest)?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }
}

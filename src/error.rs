/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/5/25
 ******************************************************************************/
use std::fmt::{Display, Formatter};
use std::{fmt, io};

#[derive(Debug)]
pub enum AppError {
    /// The server answered with a status outside 200..=299.
    HttpStatus(u16),
    /// Connectivity, DNS, TLS or timeout failure below HTTP.
    Transport(reqwest::Error),
    /// Neither a response nor an error came back from the transport.
    Session,
    /// A request for the same key is already outstanding.
    RequestInProgress,
    /// Malformed URL or configuration, or a missing precondition such as an absent token.
    InvalidRequest,
    /// The profile carries no avatar image.
    NoImageUrl,
    /// A newer request superseded this one before it completed.
    Cancelled,
    Json(serde_json::Error),
    Io(io::Error),
    Storage(String),
}

impl AppError {
    /// Whether a caller-initiated retry of the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport(_) | AppError::Session => true,
            AppError::HttpStatus(code) => *code >= 500,
            _ => false,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::HttpStatus(code) => write!(f, "unexpected http status: {code}"),
            AppError::Transport(e) => write!(f, "network error: {e}"),
            AppError::Session => write!(f, "no response and no error from transport"),
            AppError::RequestInProgress => write!(f, "request already in progress"),
            AppError::InvalidRequest => write!(f, "invalid request"),
            AppError::NoImageUrl => write!(f, "profile has no image url"),
            AppError::Cancelled => write!(f, "request cancelled"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Transport(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AppError::HttpStatus(status.as_u16()),
            None => AppError::Transport(e),
        }
    }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e)
    }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
impl From<url::ParseError> for AppError {
    fn from(_: url::ParseError) -> Self {
        AppError::InvalidRequest
    }
}
impl From<reqwest::header::InvalidHeaderValue> for AppError {
    fn from(_: reqwest::header::InvalidHeaderValue) -> Self {
        AppError::InvalidRequest
    }
}

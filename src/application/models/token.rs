use serde::{Deserialize, Serialize};
use std::fmt;

/// Body returned by the OAuth token endpoint
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthTokenResponseBody {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub created_at: i64,
}

impl fmt::Debug for OAuthTokenResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokenResponseBody")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/5/25
******************************************************************************/

pub(crate) const AUTHORIZATION_HEADER_KEY: &str = "Authorization";
pub(crate) const BEARER_PREFIX: &str = "Bearer";

pub(crate) const TOKEN_STORAGE_KEY: &str = "oauth_token";

pub(crate) const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";
pub(crate) const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

pub(crate) const PROFILE_SEGMENT: &str = "me";
pub(crate) const PHOTOS_SEGMENT: &str = "photos";
pub(crate) const USERS_SEGMENT: &str = "users";
pub(crate) const LIKE_SEGMENT: &str = "like";

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_ORDER_BY: &str = "latest";
pub const DEFAULT_REST_TIMEOUT: u64 = 30;

/// Capacity of the notification channel before slow subscribers start lagging.
pub(crate) const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

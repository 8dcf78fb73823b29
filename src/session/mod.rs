pub mod auth_helper;

pub mod interface;

pub mod logout;

pub mod oauth;

pub use auth_helper::AuthHelper;
pub use interface::{BrowserDataStore, NoBrowserData, OAuthAuthenticator};
pub use logout::{LogoutReport, LogoutStep, ProfileLogoutService};
pub use oauth::OAuth2Service;

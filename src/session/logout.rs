use crate::application::events::{Notification, NotificationCenter};
use crate::application::services::{FeedService, ProfileService};
use crate::config::Config;
use crate::error::AppError;
use crate::session::interface::BrowserDataStore;
use crate::storage::TokenStore;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

/// Logout steps that can fail. Cache cleaning and the final notification cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutStep {
    ClearCookies,
    ClearSiteData,
    DeleteToken,
}

impl fmt::Display for LogoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogoutStep::ClearCookies => "clear cookies",
            LogoutStep::ClearSiteData => "clear site data",
            LogoutStep::DeleteToken => "delete token",
        };
        write!(f, "{name}")
    }
}

/// Outcome of [`ProfileLogoutService::logout`]. Failed steps are recorded, never fatal.
#[derive(Debug, Default)]
pub struct LogoutReport {
    pub failures: Vec<(LogoutStep, AppError)>,
}

impl LogoutReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, step: LogoutStep) -> bool {
        self.failures.iter().any(|(failed, _)| *failed == step)
    }

    fn record(&mut self, step: LogoutStep, result: Result<(), AppError>) {
        if let Err(e) = result {
            warn!("Logout step '{}' failed: {}", step, e);
            self.failures.push((step, e));
        }
    }
}

/// Returns the client to the unauthenticated state.
pub struct ProfileLogoutService {
    config: Arc<Config>,
    browser: Arc<dyn BrowserDataStore>,
    token_store: TokenStore,
    profile: Arc<dyn ProfileService>,
    feed: Arc<dyn FeedService>,
    notifications: NotificationCenter,
}

impl ProfileLogoutService {
    pub fn new(
        config: Arc<Config>,
        browser: Arc<dyn BrowserDataStore>,
        token_store: TokenStore,
        profile: Arc<dyn ProfileService>,
        feed: Arc<dyn FeedService>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            config,
            browser,
            token_store,
            profile,
            feed,
            notifications,
        }
    }

    /// Host of the authorization page, whose site data holds the web login session.
    pub fn identity_domain(&self) -> Result<String, AppError> {
        let url = Url::parse(&self.config.auth.authorize_url)?;
        url.host_str()
            .map(str::to_string)
            .ok_or(AppError::InvalidRequest)
    }

    /// Runs every logout step in order, continuing past failures.
    ///
    /// Once this returns, the token, profile, avatar URL and photo list are
    /// all gone regardless of what the browser steps reported.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> LogoutReport {
        info!("Logging out");
        let mut report = LogoutReport::default();

        report.record(LogoutStep::ClearCookies, self.browser.clear_cookies().await);

        let site_data = match self.identity_domain() {
            Ok(domain) => self.browser.clear_site_data(&domain).await,
            Err(e) => Err(e),
        };
        report.record(LogoutStep::ClearSiteData, site_data);

        report.record(LogoutStep::DeleteToken, self.token_store.set(None));

        self.profile.clean_profile();
        self.feed.clean_photos();
        self.notifications.publish(Notification::LoggedOut);

        info!("Logged out with {} failed step(s)", report.failures.len());
        report
    }
}

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        events::{Notification, NotificationCenter},
        models::profile::{Profile, ProfileResult, UserResult},
    },
    config::Config,
    constants::{PROFILE_SEGMENT, USERS_SEGMENT},
    error::AppError,
    storage::TokenStore,
    transport::{ApiRequest, GatePolicy, HttpClient, RequestGate},
};

/// Profile of the signed-in user
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Fetches `/me`, replacing the cached profile. A newer call cancels an older one.
    async fn fetch_profile(&self) -> Result<Profile, AppError>;

    fn profile(&self) -> Option<Profile>;

    fn avatar_url(&self) -> Option<String>;

    /// Forgets the cached profile and avatar URL and cancels outstanding fetches,
    /// whose replies are then dropped.
    fn clean_profile(&self);
}

/// Avatar lookup for a user by name
#[async_trait]
pub trait ProfileImageService: Send + Sync {
    async fn fetch_profile_image_url(&self, username: &str) -> Result<String, AppError>;
}

#[derive(Debug, Default)]
struct ProfileCache {
    profile: Option<Profile>,
    avatar_url: Option<String>,
}

pub struct ProfileServiceImpl<T: HttpClient> {
    config: Arc<Config>,
    client: Arc<T>,
    token_store: TokenStore,
    notifications: NotificationCenter,
    profile_gate: RequestGate<()>,
    image_gate: RequestGate<()>,
    cache: Mutex<ProfileCache>,
}

impl<T: HttpClient> ProfileServiceImpl<T> {
    pub fn new(
        config: Arc<Config>,
        client: Arc<T>,
        token_store: TokenStore,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            config,
            client,
            token_store,
            notifications,
            profile_gate: RequestGate::new(),
            image_gate: RequestGate::new(),
            cache: Mutex::new(ProfileCache::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProfileCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_avatar(&self, url: &str) {
        self.notifications
            .publish(Notification::AvatarChanged(url.to_string()));
    }
}

#[async_trait]
impl<T: HttpClient + 'static> ProfileService for ProfileServiceImpl<T> {
    #[instrument(skip(self))]
    async fn fetch_profile(&self) -> Result<Profile, AppError> {
        let mut ticket = self.profile_gate.acquire((), GatePolicy::Supersede)?;
        let token = self.token_store.require()?;
        let request =
            ApiRequest::get(self.config.rest_url_for(&[PROFILE_SEGMENT])?).bearer(&token);

        info!("Fetching profile");
        let result: ProfileResult = match ticket.run(self.client.request(request)).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to fetch profile: {}", e);
                return Err(e);
            }
        };

        let profile = Profile::from(&result);
        let avatar = result.avatar_url().map(str::to_string);
        ticket.commit(|| {
            let mut cache = self.lock();
            cache.profile = Some(profile.clone());
            if let Some(url) = &avatar {
                cache.avatar_url = Some(url.clone());
            }
        })?;
        drop(ticket);

        if let Some(url) = avatar {
            self.publish_avatar(&url);
        }
        debug!("Profile loaded for {}", profile.login_name);
        Ok(profile)
    }

    fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    fn avatar_url(&self) -> Option<String> {
        self.lock().avatar_url.clone()
    }

    fn clean_profile(&self) {
        self.profile_gate.cancel();
        self.image_gate.cancel();
        let mut cache = self.lock();
        cache.profile = None;
        cache.avatar_url = None;
        debug!("Profile cache cleaned");
    }
}

#[async_trait]
impl<T: HttpClient + 'static> ProfileImageService for ProfileServiceImpl<T> {
    #[instrument(skip(self))]
    async fn fetch_profile_image_url(&self, username: &str) -> Result<String, AppError> {
        if username.is_empty() {
            return Err(AppError::InvalidRequest);
        }
        let mut ticket = self.image_gate.acquire((), GatePolicy::Supersede)?;
        let token = self.token_store.require()?;
        let url = self.config.rest_url_for(&[USERS_SEGMENT, username])?;
        let request = ApiRequest::get(url).bearer(&token);

        let result: UserResult = ticket.run(self.client.request(request)).await?;
        let avatar = result
            .profile_image
            .and_then(|image| image.small)
            .ok_or(AppError::NoImageUrl)?;

        ticket.commit(|| self.lock().avatar_url = Some(avatar.clone()))?;
        drop(ticket);
        self.publish_avatar(&avatar);
        Ok(avatar)
    }
}

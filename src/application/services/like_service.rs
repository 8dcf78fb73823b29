use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{models::photo::LikeResult, services::feed_service::FeedService},
    config::Config,
    constants::{LIKE_SEGMENT, PHOTOS_SEGMENT},
    error::AppError,
    storage::TokenStore,
    transport::{ApiRequest, HttpClient},
};

/// Toggles the liked state of single photos
#[async_trait]
pub trait LikeService: Send + Sync {
    /// Asks the server to set the liked state of `photo_id` to `is_like`.
    ///
    /// Returns the liked state the server reports, which is also what the
    /// feed ends up showing. On failure the feed is left untouched.
    async fn change_like(&self, photo_id: &str, is_like: bool) -> Result<bool, AppError>;
}

pub struct LikeServiceImpl<T: HttpClient> {
    config: Arc<Config>,
    client: Arc<T>,
    token_store: TokenStore,
    feed: Arc<dyn FeedService>,
}

impl<T: HttpClient> LikeServiceImpl<T> {
    pub fn new(
        config: Arc<Config>,
        client: Arc<T>,
        token_store: TokenStore,
        feed: Arc<dyn FeedService>,
    ) -> Self {
        Self {
            config,
            client,
            token_store,
            feed,
        }
    }

    fn make_like_request(&self, photo_id: &str, is_like: bool) -> Result<ApiRequest, AppError> {
        let token = self.token_store.require()?;
        let url = self
            .config
            .rest_url_for(&[PHOTOS_SEGMENT, photo_id, LIKE_SEGMENT])?;
        let method = if is_like { Method::POST } else { Method::DELETE };
        Ok(ApiRequest::new(method, url).bearer(&token))
    }
}

#[async_trait]
impl<T: HttpClient + 'static> LikeService for LikeServiceImpl<T> {
    #[instrument(skip(self))]
    async fn change_like(&self, photo_id: &str, is_like: bool) -> Result<bool, AppError> {
        info!("Setting liked={} on photo {}", is_like, photo_id);
        let request = self.make_like_request(photo_id, is_like)?;

        let result = match self.client.request::<LikeResult>(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to change like on photo {}: {}", photo_id, e);
                return Err(e);
            }
        };

        let liked = result.photo.liked_by_user;
        if liked != is_like {
            debug!(
                "Server reports liked={} for photo {} after requesting {}",
                liked, photo_id, is_like
            );
        }
        self.feed.apply_like(photo_id, liked);
        Ok(liked)
    }
}

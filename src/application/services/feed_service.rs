use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        events::{Notification, NotificationCenter},
        models::photo::{Photo, PhotoResult},
    },
    config::Config,
    constants::PHOTOS_SEGMENT,
    error::AppError,
    storage::TokenStore,
    transport::{ApiRequest, HttpClient},
};

/// Result of a [`FeedService::fetch_next_page`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFetch {
    /// The page was appended and the cursor now points at it.
    Loaded { page: u32, count: usize },
    /// Another fetch was outstanding; nothing was requested.
    AlreadyInFlight,
    /// The feed was cleaned while this page was in flight; the result was dropped.
    Discarded,
}

/// Accumulated photo feed, grown one page at a time
#[async_trait]
pub trait FeedService: Send + Sync {
    /// Requests the page after the last loaded one and appends it.
    async fn fetch_next_page(&self) -> Result<PageFetch, AppError>;

    fn photos(&self) -> Vec<Photo>;

    fn photo_count(&self) -> usize;

    fn last_loaded_page(&self) -> Option<u32>;

    fn is_loading(&self) -> bool;

    /// Overwrites the liked flag of the photo with `photo_id`. Returns whether it was found.
    fn apply_like(&self, photo_id: &str, is_liked: bool) -> bool;

    /// Empties the feed and resets the cursor.
    fn clean_photos(&self);
}

#[derive(Debug, Default)]
struct FeedState {
    photos: Vec<Photo>,
    last_loaded_page: Option<u32>,
    loading: Option<u64>,
    next_fetch_id: u64,
}

/// Feed backed by the photos list endpoint
pub struct FeedServiceImpl<T: HttpClient> {
    config: Arc<Config>,
    client: Arc<T>,
    token_store: TokenStore,
    notifications: NotificationCenter,
    state: Mutex<FeedState>,
}

/// Releases the loading marker of one fetch however that fetch ends.
struct LoadingGuard<'a> {
    state: &'a Mutex<FeedState>,
    fetch_id: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.loading == Some(self.fetch_id) {
            state.loading = None;
        }
    }
}

impl<T: HttpClient> FeedServiceImpl<T> {
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
            state: Mutex::new(FeedState::default()),
        }
    }

    pub fn get_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn make_page_request(&self, page: u32) -> Result<ApiRequest, AppError> {
        let token = self.token_store.require()?;
        let url = self.config.rest_url_for(&[PHOTOS_SEGMENT])?;
        Ok(ApiRequest::get(url)
            .query("page", page)
            .query("per_page", self.config.feed.per_page)
            .query("order_by", &self.config.feed.order_by)
            .bearer(&token))
    }
}

#[async_trait]
impl<T: HttpClient + 'static> FeedService for FeedServiceImpl<T> {
    #[instrument(skip(self))]
    async fn fetch_next_page(&self) -> Result<PageFetch, AppError> {
        let (page, fetch_id) = {
            let mut state = self.lock();
            if state.loading.is_some() {
                debug!("Page fetch already in flight, skipping");
                return Ok(PageFetch::AlreadyInFlight);
            }
            state.next_fetch_id += 1;
            let fetch_id = state.next_fetch_id;
            state.loading = Some(fetch_id);
            (state.last_loaded_page.map_or(1, |last| last + 1), fetch_id)
        };
        let _guard = LoadingGuard {
            state: &self.state,
            fetch_id,
        };

        info!("Fetching photos page {}", page);
        let request = self.make_page_request(page)?;
        let results = match self.client.request::<Vec<PhotoResult>>(request).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Failed to fetch photos page {}: {}", page, e);
                return Err(e);
            }
        };
        let photos: Vec<Photo> = results.into_iter().map(Photo::from).collect();
        let count = photos.len();

        {
            let mut state = self.lock();
            if state.loading != Some(fetch_id) {
                debug!("Feed cleaned while page {} was in flight, discarding", page);
                return Ok(PageFetch::Discarded);
            }
            state.photos.extend(photos);
            state.last_loaded_page = Some(page);
            state.loading = None;
        }

        debug!("Page {} loaded with {} photos", page, count);
        self.notifications.publish(Notification::FeedChanged);
        Ok(PageFetch::Loaded { page, count })
    }

    fn photos(&self) -> Vec<Photo> {
        self.lock().photos.clone()
    }

    fn photo_count(&self) -> usize {
        self.lock().photos.len()
    }

    fn last_loaded_page(&self) -> Option<u32> {
        self.lock().last_loaded_page
    }

    fn is_loading(&self) -> bool {
        self.lock().loading.is_some()
    }

    fn apply_like(&self, photo_id: &str, is_liked: bool) -> bool {
        let found = {
            let mut state = self.lock();
            match state.photos.iter_mut().find(|photo| photo.id == photo_id) {
                Some(photo) => {
                    photo.is_liked = is_liked;
                    true
                }
                None => false,
            }
        };

        if found {
            self.notifications.publish(Notification::FeedChanged);
        } else {
            debug!("Photo {} not in feed, nothing to reconcile", photo_id);
        }
        found
    }

    fn clean_photos(&self) {
        let mut state = self.lock();
        state.photos.clear();
        state.last_loaded_page = None;
        state.loading = None;
        debug!("Feed cleaned");
    }
}

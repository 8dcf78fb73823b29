/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/5/25
******************************************************************************/
use mockito::ServerGuard;
use photo_feed_client::application::events::NotificationCenter;
use photo_feed_client::application::services::{FeedServiceImpl, ProfileServiceImpl};
use photo_feed_client::config::Config;
use photo_feed_client::storage::{FileStorage, TokenStore};
use photo_feed_client::transport::ReqwestHttpClient;
use photo_feed_client::utils::logger::setup_logger;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

mod feed_flow;

/// Every service wired against one mock server, with the token in a temp file.
pub struct Harness {
    pub server: ServerGuard,
    pub config: Arc<Config>,
    pub client: Arc<ReqwestHttpClient>,
    pub token_store: TokenStore,
    pub notifications: NotificationCenter,
    pub profile: Arc<ProfileServiceImpl<ReqwestHttpClient>>,
    pub feed: Arc<FeedServiceImpl<ReqwestHttpClient>>,
    _dir: TempDir,
}

impl Harness {
    pub async fn new(token: Option<&str>) -> Self {
        setup_logger();
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::new();
        config.credentials.access_key = "client_1".to_string();
        config.credentials.secret_key = "secret_1".to_string();
        config.credentials.redirect_uri = "urn:ietf:wg:oauth:2.0:oob".to_string();
        config.auth.authorize_url = format!("{}/oauth/authorize", server.url());
        config.auth.token_url = format!("{}/oauth/token", server.url());
        config.rest_api.base_url = server.url();
        config.rest_api.timeout = 5;
        config.feed.per_page = 10;
        config.feed.order_by = "latest".to_string();
        let token_file = dir.path().join("token.json");
        config.storage.token_file = token_file.display().to_string();
        let config = Arc::new(config);

        let token_store = TokenStore::new(Arc::new(FileStorage::new(token_file)));
        token_store.set(token).unwrap();

        let client = Arc::new(ReqwestHttpClient::new(&config.rest_api).unwrap());
        let notifications = NotificationCenter::new();
        let profile = Arc::new(ProfileServiceImpl::new(
            config.clone(),
            client.clone(),
            token_store.clone(),
            notifications.clone(),
        ));
        let feed = Arc::new(FeedServiceImpl::new(
            config.clone(),
            client.clone(),
            token_store.clone(),
            notifications.clone(),
        ));

        Self {
            server,
            config,
            client,
            token_store,
            notifications,
            profile,
            feed,
            _dir: dir,
        }
    }
}

pub fn photo(id: &str, liked: bool) -> Value {
    json!({
        "id": id,
        "created_at": "2024-03-05T08:30:00-05:00",
        "width": 3000,
        "height": 2000,
        "liked_by_user": liked,
        "description": "Harbour at dawn",
        "urls": {
            "raw": format!("https://images.example.com/{id}?raw"),
            "full": format!("https://images.example.com/{id}?full"),
            "regular": format!("https://images.example.com/{id}?regular"),
            "small": format!("https://images.example.com/{id}?small"),
            "thumb": format!("https://images.example.com/{id}?thumb")
        }
    })
}

pub fn page(page: u32, size: usize) -> String {
    Value::Array(
        (0..size)
            .map(|i| photo(&format!("page{page}_{i}"), false))
            .collect(),
    )
    .to_string()
}

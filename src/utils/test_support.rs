use crate::application::events::NotificationCenter;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::{MemoryStorage, TokenStore};
use crate::transport::{ApiRequest, HttpClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Reply = Result<Vec<u8>, AppError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// In-process [`HttpClient`] answering from a queue of scripted replies.
///
/// Gated replies stay pending until the test releases them, which is how
/// tests hold a request "in flight". An empty queue answers with
/// [`AppError::Session`].
#[derive(Default)]
pub(crate) struct ScriptedHttpClient {
    requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<Scripted>>,
}

impl ScriptedHttpClient {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, value: Value) {
        self.push(Scripted::Ready(Ok(value.to_string().into_bytes())));
    }

    pub(crate) fn push_error(&self, error: AppError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// Queues a reply that only resolves once the returned sender fires.
    pub(crate) fn push_gated(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, scripted: Scripted) {
        self.replies.lock().unwrap().push_back(scripted);
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, AppError> {
        self.requests.lock().unwrap().push(request);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or(Err(AppError::Session)),
            None => Err(AppError::Session),
        }
    }
}

pub(crate) fn json_reply(value: Value) -> Reply {
    Ok(value.to_string().into_bytes())
}

pub(crate) fn test_config() -> Arc<Config> {
    let mut config = Config::new();
    config.credentials.access_key = "test_access_key".to_string();
    config.credentials.secret_key = "test_secret_key".to_string();
    config.credentials.redirect_uri = "urn:ietf:wg:oauth:2.0:oob".to_string();
    config.credentials.access_scope = "public+read_user+write_likes".to_string();
    config.auth.authorize_url = "https://auth.example.com/oauth/authorize".to_string();
    config.auth.token_url = "https://auth.example.com/oauth/token".to_string();
    config.rest_api.base_url = "https://api.example.com".to_string();
    config.feed.per_page = 10;
    config.feed.order_by = "latest".to_string();
    Arc::new(config)
}

pub(crate) fn token_store_with(token: Option<&str>) -> TokenStore {
    let store = TokenStore::new(Arc::new(MemoryStorage::new()));
    store.set(token).unwrap();
    store
}

pub(crate) fn notifications() -> NotificationCenter {
    NotificationCenter::new()
}

pub(crate) fn photo_json(id: &str, liked: bool) -> Value {
    json!({
        "id": id,
        "created_at": "2024-02-01T10:00:00Z",
        "width": 4000,
        "height": 3000,
        "liked_by_user": liked,
        "description": null,
        "urls": {
            "raw": format!("https://images.example.com/{id}/raw"),
            "full": format!("https://images.example.com/{id}/full"),
            "regular": format!("https://images.example.com/{id}/regular"),
            "small": format!("https://images.example.com/{id}/small"),
            "thumb": format!("https://images.example.com/{id}/thumb")
        }
    })
}

/// A full page of photos with ids `p{page}-0` .. `p{page}-{size-1}`.
pub(crate) fn page_json(page: u32, size: usize) -> Value {
    Value::Array(
        (0..size)
            .map(|i| photo_json(&format!("p{page}-{i}"), false))
            .collect(),
    )
}

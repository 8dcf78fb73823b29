/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 15/5/25
 ******************************************************************************/
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Set of image URLs the API returns for every photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlsResult {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// Photo record as returned by the photos list and like endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoResult {
    pub id: String,
    pub created_at: Option<String>,
    pub width: u32,
    pub height: u32,
    pub liked_by_user: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub urls: UrlsResult,
}

/// Envelope returned by `POST`/`DELETE /photos/{id}/like`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikeResult {
    pub photo: PhotoResult,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
}

/// A photo in the feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub id: String,
    pub size: PhotoSize,
    pub created_at: Option<DateTime<Utc>>,
    pub welcome_description: Option<String>,
    pub thumb_image_url: String,
    pub large_image_url: String,
    pub is_liked: bool,
}

/// Parses an ISO-8601 timestamp; anything unparsable becomes `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unparsable timestamp {:?}: {}", value, e);
            None
        }
    }
}

impl From<PhotoResult> for Photo {
    fn from(result: PhotoResult) -> Self {
        Photo {
            created_at: result.created_at.as_deref().and_then(parse_timestamp),
            size: PhotoSize {
                width: result.width,
                height: result.height,
            },
            welcome_description: result.description,
            thumb_image_url: result.urls.thumb,
            large_image_url: result.urls.full,
            is_liked: result.liked_by_user,
            id: result.id,
        }
    }
}

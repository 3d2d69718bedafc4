//! Feed photo types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Pixel dimensions of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A photo in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Server identifier, unique within the feed.
    pub id: String,
    /// Original dimensions.
    pub size: PhotoSize,
    /// Upload time, when the server sent a parseable timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Author's description.
    pub description: Option<String>,
    /// Thumbnail rendition.
    pub thumbnail_url: Url,
    /// Full-size rendition.
    pub full_url: Url,
    /// Total like count reported by the server.
    pub likes: u64,
    /// Whether the current user likes this photo.
    pub is_liked: bool,
}

impl From<PhotoResult> for Photo {
    fn from(result: PhotoResult) -> Self {
        let created_at = DateTime::parse_from_rfc3339(&result.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            id: result.id,
            size: PhotoSize {
                width: result.width,
                height: result.height,
            },
            created_at,
            description: result.description,
            thumbnail_url: result.urls.thumb,
            full_url: result.urls.full,
            likes: result.likes,
            is_liked: result.liked_by_user,
        }
    }
}

/// One element of the `GET /photos` response array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoResult {
    /// Photo identifier.
    pub id: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Like count.
    pub likes: u64,
    /// Whether the requesting user likes the photo.
    pub liked_by_user: bool,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Renditions.
    pub urls: UrlsResult,
}

/// Photo renditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlsResult {
    /// Original upload.
    pub raw: Url,
    /// Full size.
    pub full: Url,
    /// 1080px wide.
    pub regular: Url,
    /// 400px wide.
    pub small: Url,
    /// 200px wide.
    pub thumb: Url,
}

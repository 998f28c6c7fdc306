use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::entities::{PostRecord, TagRecord};
use crate::domain::types::MediaType;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostMediaRequest {
    pub media_type: MediaType,
    pub external_id: String,
    pub title: String,
    pub background_image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub media: Vec<PostMediaRequest>,
}

/// Absent fields are left untouched; `tag_ids` and `media` replace the
/// current set when present.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PostUpdateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub tag_ids: Option<Vec<i64>>,
    pub media: Option<Vec<PostMediaRequest>>,
}

/// Admin list row; the body is left out.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub tags: Vec<TagRecord>,
}

impl From<PostRecord> for PostSummary {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            published: post.published,
            created_at: post.created_at,
            updated_at: post.updated_at,
            tags: post.tags,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TagCreateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PageCreateRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PageUpdateRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavLinkCreateRequest {
    pub page_id: Option<i64>,
    pub custom_label: Option<String>,
    pub custom_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SocialLinkCreateRequest {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CountryCreateRequest {
    pub name: String,
    pub iso_numeric: i32,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProfileUpdateRequest {
    pub photo_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

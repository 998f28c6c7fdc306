use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::types::MediaType;

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("post not found")]
    NotFound,
    #[error("one or more tag ids are invalid")]
    InvalidTags,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct PostMediaInput {
    pub media_type: MediaType,
    pub external_id: String,
    pub title: String,
    pub background_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub tag_ids: Vec<i64>,
    pub media: Vec<PostMediaInput>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub tag_ids: Option<Vec<i64>>,
    pub media: Option<Vec<PostMediaInput>>,
}

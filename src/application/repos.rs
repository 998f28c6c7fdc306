//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{
    CountryRecord, NavLinkRecord, PageRecord, PostRecord, SiteProfileRecord, SocialLinkRecord,
    TagRecord, UserRecord,
};
use crate::domain::navigation::NavTarget;
use crate::domain::ordering::ReorderError;
use crate::domain::types::{MediaType, TravelList};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error(transparent)]
    Reorder(#[from] ReorderError),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    /// Tag slug.
    pub tag: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostMediaParams {
    pub media_type: MediaType,
    pub external_id: String,
    pub title: String,
    pub background_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub tag_ids: Vec<i64>,
    pub media: Vec<PostMediaParams>,
}

/// Full replacement of a post's editable fields. `None` relations keep the
/// stored associations untouched.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub tag_ids: Option<Vec<i64>>,
    pub media: Option<Vec<PostMediaParams>>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_published(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostRecord>, u64), RepoError>;

    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: i64) -> Result<(), RepoError>;
}

/// Lookup used to gate upstream media fetches on local references.
#[async_trait]
pub trait MediaReferenceRepo: Send + Sync {
    async fn is_referenced(&self, media_type: MediaType, external_id: &str)
    -> Result<bool, RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<TagRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<TagRecord>, RepoError>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<TagRecord>, RepoError>;
}

#[async_trait]
pub trait TagsWriteRepo: Send + Sync {
    async fn create_tag(&self, name: &str, slug: &str) -> Result<TagRecord, RepoError>;

    async fn delete_tag(&self, id: i64) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreatePageParams {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct UpdatePageParams {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub published: bool,
}

#[async_trait]
pub trait PagesRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<PageRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PageRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PageRecord>, RepoError>;
}

#[async_trait]
pub trait PagesWriteRepo: Send + Sync {
    async fn create_page(&self, params: CreatePageParams) -> Result<PageRecord, RepoError>;

    async fn update_page(&self, params: UpdatePageParams) -> Result<PageRecord, RepoError>;

    /// Delete the page along with any nav link pointing at it, keeping nav
    /// positions dense.
    async fn delete_page(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait NavLinksRepo: Send + Sync {
    /// All links ordered by position, including links to unpublished pages.
    async fn list_nav_links(&self) -> Result<Vec<NavLinkRecord>, RepoError>;

    async fn find_by_page(&self, page_id: i64) -> Result<Option<NavLinkRecord>, RepoError>;
}

#[async_trait]
pub trait NavLinksWriteRepo: Send + Sync {
    /// Insert at `MAX(position) + 1` under a table lock.
    async fn append_nav_link(&self, target: NavTarget) -> Result<NavLinkRecord, RepoError>;

    /// Remove the link and renumber the rest `1..N`.
    async fn delete_nav_link(&self, id: i64) -> Result<(), RepoError>;

    /// Apply a full permutation atomically and return the links in the new order.
    async fn reorder_nav_links(&self, ordered_ids: &[i64])
    -> Result<Vec<NavLinkRecord>, RepoError>;
}

#[async_trait]
pub trait SocialLinksRepo: Send + Sync {
    async fn list_social_links(&self) -> Result<Vec<SocialLinkRecord>, RepoError>;
}

#[async_trait]
pub trait SocialLinksWriteRepo: Send + Sync {
    async fn append_social_link(
        &self,
        platform: &str,
        url: &str,
    ) -> Result<SocialLinkRecord, RepoError>;

    async fn delete_social_link(&self, id: i64) -> Result<(), RepoError>;

    async fn reorder_social_links(
        &self,
        ordered_ids: &[i64],
    ) -> Result<Vec<SocialLinkRecord>, RepoError>;
}

#[async_trait]
pub trait TravelsRepo: Send + Sync {
    async fn list_countries(&self, list: TravelList) -> Result<Vec<CountryRecord>, RepoError>;

    async fn add_country(
        &self,
        list: TravelList,
        name: &str,
        iso_numeric: i32,
    ) -> Result<CountryRecord, RepoError>;

    async fn delete_country(&self, list: TravelList, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn load_profile(&self) -> Result<Option<SiteProfileRecord>, RepoError>;

    async fn upsert_profile(
        &self,
        profile: &SiteProfileRecord,
    ) -> Result<SiteProfileRecord, RepoError>;

    async fn set_photo_url(&self, photo_url: &str) -> Result<SiteProfileRecord, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn create_user(&self, username: &str, password_hash: &str)
    -> Result<UserRecord, RepoError>;

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), RepoError>;
}

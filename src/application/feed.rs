//! Public read side for posts and tags.

use std::sync::Arc;

use crate::application::pagination::{PageRequest, Paginated};
use crate::application::repos::{PostQueryFilter, PostsRepo, RepoError, TagsRepo};
use crate::domain::entities::{PostRecord, TagRecord};

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    tags: Arc<dyn TagsRepo>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, tags: Arc<dyn TagsRepo>) -> Self {
        Self { posts, tags }
    }

    /// Published posts, newest first, optionally narrowed to one tag slug.
    pub async fn published_posts(
        &self,
        tag: Option<String>,
        request: PageRequest,
    ) -> Result<Paginated<PostRecord>, RepoError> {
        let filter = PostQueryFilter {
            tag: tag.filter(|value| !value.trim().is_empty()),
        };
        let (items, total) = self.posts.list_published(&filter, request).await?;
        Ok(Paginated::new(items, total, request))
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        self.posts.find_published_by_slug(slug).await
    }

    pub async fn tags(&self) -> Result<Vec<TagRecord>, RepoError> {
        self.tags.list_all().await
    }
}

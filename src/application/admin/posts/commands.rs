use tracing::info;

use crate::application::admin::{require_non_blank, trimmed};
use crate::application::repos::{CreatePostParams, PostMediaParams, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};

use super::service::AdminPostService;
use super::types::{AdminPostError, CreatePostCommand, PostMediaInput, UpdatePostCommand};

impl AdminPostService {
    pub async fn create_post(
        &self,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let CreatePostCommand {
            title,
            content,
            excerpt,
            published,
            tag_ids,
            media,
        } = command;

        let title = require_non_blank(&title, "title").map_err(AdminPostError::ConstraintViolation)?;
        let tag_ids = self.resolve_tags(tag_ids).await?;
        let media = normalize_media(media)?;
        let slug = self.unique_slug(&title).await?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                slug,
                title,
                content,
                excerpt: trimmed(excerpt),
                published,
                tag_ids,
                media,
            })
            .await?;

        info!(target = "folio::admin::posts", post_id = post.id, slug = %post.slug, "post created");
        Ok(post)
    }

    /// Apply the supplied fields. The slug stays fixed even when the title
    /// changes so published URLs keep working.
    pub async fn update_post(
        &self,
        id: i64,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let existing = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::NotFound)?;

        let title = match command.title {
            Some(title) => {
                require_non_blank(&title, "title").map_err(AdminPostError::ConstraintViolation)?
            }
            None => existing.title,
        };
        let tag_ids = match command.tag_ids {
            Some(ids) => Some(self.resolve_tags(ids).await?),
            None => None,
        };
        let media = command.media.map(normalize_media).transpose()?;

        let params = UpdatePostParams {
            id,
            title,
            content: command.content.unwrap_or(existing.content),
            excerpt: match command.excerpt {
                Some(excerpt) => trimmed(Some(excerpt)),
                None => existing.excerpt,
            },
            published: command.published.unwrap_or(existing.published),
            tag_ids,
            media,
        };

        match self.writer.update_post(params).await {
            Ok(post) => Ok(post),
            Err(RepoError::NotFound) => Err(AdminPostError::NotFound),
            Err(err) => Err(AdminPostError::Repo(err)),
        }
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), AdminPostError> {
        match self.writer.delete_post(id).await {
            Ok(()) => {
                info!(target = "folio::admin::posts", post_id = id, "post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(AdminPostError::NotFound),
            Err(err) => Err(AdminPostError::Repo(err)),
        }
    }

    /// Deduplicate and confirm every id names an existing tag.
    async fn resolve_tags(&self, mut ids: Vec<i64>) -> Result<Vec<i64>, AdminPostError> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(ids);
        }

        let found = self.tags.find_by_ids(&ids).await?;
        if found.len() != ids.len() {
            return Err(AdminPostError::InvalidTags);
        }
        Ok(ids)
    }

    async fn unique_slug(&self, title: &str) -> Result<String, AdminPostError> {
        let reader = self.reader.clone();
        match generate_unique_slug_async(title, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move { reader.slug_exists(&candidate).await.map(|taken| !taken) }
        })
        .await
        {
            Ok(slug) => Ok(slug),
            Err(SlugAsyncError::Slug(SlugError::EmptyInput)) => {
                Err(AdminPostError::ConstraintViolation("title"))
            }
            Err(SlugAsyncError::Slug(SlugError::Malformed { .. })) => {
                Err(AdminPostError::ConstraintViolation("slug"))
            }
            Err(SlugAsyncError::Predicate(err)) => Err(AdminPostError::Repo(err)),
        }
    }
}

fn normalize_media(media: Vec<PostMediaInput>) -> Result<Vec<PostMediaParams>, AdminPostError> {
    media
        .into_iter()
        .map(|item| {
            let external_id = require_non_blank(&item.external_id, "media.external_id")
                .map_err(AdminPostError::ConstraintViolation)?;
            let title = require_non_blank(&item.title, "media.title")
                .map_err(AdminPostError::ConstraintViolation)?;
            Ok(PostMediaParams {
                media_type: item.media_type,
                external_id,
                title,
                background_image_url: trimmed(item.background_image_url),
            })
        })
        .collect()
}

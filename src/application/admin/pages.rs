use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::admin::require_non_blank;
use crate::application::repos::{
    CreatePageParams, PagesRepo, PagesWriteRepo, RepoError, UpdatePageParams,
};
use crate::domain::entities::PageRecord;
use crate::domain::slug::validate_explicit_slug;

#[derive(Debug, Error)]
pub enum AdminPageError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("slug `{0}` must be lowercase letters and digits separated by single hyphens")]
    InvalidSlug(String),
    #[error("a page with slug `{0}` already exists")]
    SlugTaken(String),
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePageCommand {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published: bool,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePageCommand {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct AdminPageService {
    reader: Arc<dyn PagesRepo>,
    writer: Arc<dyn PagesWriteRepo>,
}

impl AdminPageService {
    pub fn new(reader: Arc<dyn PagesRepo>, writer: Arc<dyn PagesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<PageRecord>, AdminPageError> {
        self.reader.list_all().await.map_err(AdminPageError::from)
    }

    pub async fn find(&self, id: i64) -> Result<PageRecord, AdminPageError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPageError::NotFound)
    }

    /// Page slugs are taken verbatim; malformed or taken slugs are rejected.
    pub async fn create_page(
        &self,
        command: CreatePageCommand,
    ) -> Result<PageRecord, AdminPageError> {
        let title =
            require_non_blank(&command.title, "title").map_err(AdminPageError::ConstraintViolation)?;
        ensure_slug_format(&command.slug)?;

        if self.reader.find_by_slug(&command.slug).await?.is_some() {
            return Err(AdminPageError::SlugTaken(command.slug));
        }

        let params = CreatePageParams {
            slug: command.slug.clone(),
            title,
            content: command.content,
            published: command.published,
        };
        let page = self
            .writer
            .create_page(params)
            .await
            .map_err(|err| slug_conflict(err, &command.slug))?;

        info!(target = "folio::admin::pages", page_id = page.id, slug = %page.slug, "page created");
        Ok(page)
    }

    pub async fn update_page(
        &self,
        id: i64,
        command: UpdatePageCommand,
    ) -> Result<PageRecord, AdminPageError> {
        let existing = self.find(id).await?;

        let slug = match command.slug {
            Some(slug) if slug != existing.slug => {
                ensure_slug_format(&slug)?;
                if let Some(other) = self.reader.find_by_slug(&slug).await? {
                    if other.id != id {
                        return Err(AdminPageError::SlugTaken(slug));
                    }
                }
                slug
            }
            _ => existing.slug,
        };

        let title = match command.title {
            Some(title) => {
                require_non_blank(&title, "title").map_err(AdminPageError::ConstraintViolation)?
            }
            None => existing.title,
        };

        let params = UpdatePageParams {
            id,
            slug: slug.clone(),
            title,
            content: command.content.unwrap_or(existing.content),
            published: command.published.unwrap_or(existing.published),
        };

        self.writer
            .update_page(params)
            .await
            .map_err(|err| slug_conflict(err, &slug))
    }

    /// Removes the page together with its nav link, if any.
    pub async fn delete_page(&self, id: i64) -> Result<(), AdminPageError> {
        match self.writer.delete_page(id).await {
            Ok(()) => {
                info!(target = "folio::admin::pages", page_id = id, "page deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(AdminPageError::NotFound),
            Err(err) => Err(AdminPageError::Repo(err)),
        }
    }
}

fn ensure_slug_format(slug: &str) -> Result<(), AdminPageError> {
    validate_explicit_slug(slug).map_err(|_| AdminPageError::InvalidSlug(slug.to_string()))
}

fn slug_conflict(err: RepoError, slug: &str) -> AdminPageError {
    match err {
        RepoError::Duplicate { .. } => AdminPageError::SlugTaken(slug.to_string()),
        RepoError::NotFound => AdminPageError::NotFound,
        other => AdminPageError::Repo(other),
    }
}

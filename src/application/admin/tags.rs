use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::admin::require_non_blank;
use crate::application::repos::{RepoError, TagsRepo, TagsWriteRepo};
use crate::domain::entities::TagRecord;
use crate::domain::slug::{SlugError, derive_slug};

#[derive(Debug, Error)]
pub enum AdminTagError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("tag `{slug}` already exists")]
    Duplicate { slug: String },
    #[error("tag not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminTagService {
    reader: Arc<dyn TagsRepo>,
    writer: Arc<dyn TagsWriteRepo>,
}

impl AdminTagService {
    pub fn new(reader: Arc<dyn TagsRepo>, writer: Arc<dyn TagsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    /// Tag slugs are the slugified name. A clash is a conflict, never suffixed.
    pub async fn create_tag(&self, name: &str) -> Result<TagRecord, AdminTagError> {
        let name = require_non_blank(name, "name").map_err(AdminTagError::ConstraintViolation)?;
        let slug = derive_slug(&name).map_err(|err| match err {
            SlugError::EmptyInput => AdminTagError::ConstraintViolation("name"),
            SlugError::Malformed { .. } => AdminTagError::ConstraintViolation("slug"),
        })?;

        if self.reader.find_by_slug(&slug).await?.is_some() {
            return Err(AdminTagError::Duplicate { slug });
        }

        let tag = match self.writer.create_tag(&name, &slug).await {
            Ok(tag) => tag,
            Err(RepoError::Duplicate { .. }) => return Err(AdminTagError::Duplicate { slug }),
            Err(err) => return Err(AdminTagError::Repo(err)),
        };

        info!(target = "folio::admin::tags", tag_id = tag.id, slug = %tag.slug, "tag created");
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: i64) -> Result<(), AdminTagError> {
        match self.writer.delete_tag(id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(AdminTagError::NotFound),
            Err(err) => Err(AdminTagError::Repo(err)),
        }
    }
}

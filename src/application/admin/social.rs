use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::admin::require_non_blank;
use crate::application::repos::{RepoError, SocialLinksRepo, SocialLinksWriteRepo};
use crate::domain::entities::SocialLinkRecord;
use crate::domain::ordering::ReorderError;

#[derive(Debug, Error)]
pub enum AdminSocialError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("social link not found")]
    NotFound,
    #[error(transparent)]
    Reorder(ReorderError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminSocialError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Reorder(err) => AdminSocialError::Reorder(err),
            RepoError::NotFound => AdminSocialError::NotFound,
            other => AdminSocialError::Repo(other),
        }
    }
}

#[derive(Clone)]
pub struct AdminSocialService {
    reader: Arc<dyn SocialLinksRepo>,
    writer: Arc<dyn SocialLinksWriteRepo>,
}

impl AdminSocialService {
    pub fn new(reader: Arc<dyn SocialLinksRepo>, writer: Arc<dyn SocialLinksWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<SocialLinkRecord>, AdminSocialError> {
        Ok(self.reader.list_social_links().await?)
    }

    pub async fn add_link(
        &self,
        platform: &str,
        url: &str,
    ) -> Result<SocialLinkRecord, AdminSocialError> {
        let platform =
            require_non_blank(platform, "platform").map_err(AdminSocialError::ConstraintViolation)?;
        let url = require_non_blank(url, "url").map_err(AdminSocialError::ConstraintViolation)?;

        let link = self.writer.append_social_link(&platform, &url).await?;
        info!(
            target = "folio::admin::social",
            social_link_id = link.id,
            platform = %link.platform,
            "social link added"
        );
        Ok(link)
    }

    pub async fn delete_link(&self, id: i64) -> Result<(), AdminSocialError> {
        Ok(self.writer.delete_social_link(id).await?)
    }

    /// `ordered_ids` must be a permutation of every current link id.
    pub async fn reorder(
        &self,
        ordered_ids: &[i64],
    ) -> Result<Vec<SocialLinkRecord>, AdminSocialError> {
        Ok(self.writer.reorder_social_links(ordered_ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_failures_keep_their_detail() {
        let err = AdminSocialError::from(RepoError::Reorder(ReorderError::Unknown { ids: vec![9] }));
        assert!(matches!(err, AdminSocialError::Reorder(ReorderError::Unknown { ref ids }) if ids == &[9]));
        assert!(matches!(
            AdminSocialError::from(RepoError::NotFound),
            AdminSocialError::NotFound
        ));
    }
}

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{NavLinksRepo, NavLinksWriteRepo, PagesRepo, RepoError};
use crate::domain::entities::NavLinkRecord;
use crate::domain::navigation::{NavTarget, NavTargetError};
use crate::domain::ordering::ReorderError;

#[derive(Debug, Error)]
pub enum AdminNavigationError {
    #[error(transparent)]
    Target(#[from] NavTargetError),
    #[error("published page not found")]
    PageNotFound,
    #[error("page is already in the navigation")]
    AlreadyLinked,
    #[error("nav link not found")]
    NotFound,
    #[error(transparent)]
    Reorder(ReorderError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminNavigationError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Reorder(err) => AdminNavigationError::Reorder(err),
            RepoError::NotFound => AdminNavigationError::NotFound,
            other => AdminNavigationError::Repo(other),
        }
    }
}

#[derive(Clone)]
pub struct AdminNavigationService {
    reader: Arc<dyn NavLinksRepo>,
    writer: Arc<dyn NavLinksWriteRepo>,
    pages: Arc<dyn PagesRepo>,
}

impl AdminNavigationService {
    pub fn new(
        reader: Arc<dyn NavLinksRepo>,
        writer: Arc<dyn NavLinksWriteRepo>,
        pages: Arc<dyn PagesRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            pages,
        }
    }

    /// All links by position, including ones hidden from the public site.
    pub async fn list(&self) -> Result<Vec<NavLinkRecord>, AdminNavigationError> {
        Ok(self.reader.list_nav_links().await?)
    }

    /// Append a link at the end of the navigation.
    pub async fn add_link(&self, target: NavTarget) -> Result<NavLinkRecord, AdminNavigationError> {
        if let NavTarget::Page { page_id } = target {
            let page = self.pages.find_by_id(page_id).await?;
            if !page.is_some_and(|page| page.published) {
                return Err(AdminNavigationError::PageNotFound);
            }
            if self.reader.find_by_page(page_id).await?.is_some() {
                return Err(AdminNavigationError::AlreadyLinked);
            }
        }

        let link = match self.writer.append_nav_link(target).await {
            Ok(link) => link,
            Err(RepoError::Duplicate { .. }) => return Err(AdminNavigationError::AlreadyLinked),
            Err(RepoError::InvalidInput { .. }) => return Err(AdminNavigationError::PageNotFound),
            Err(err) => return Err(err.into()),
        };

        info!(
            target = "folio::admin::navigation",
            nav_link_id = link.id,
            position = link.position,
            "nav link added"
        );
        Ok(link)
    }

    pub async fn delete_link(&self, id: i64) -> Result<(), AdminNavigationError> {
        self.writer.delete_nav_link(id).await?;
        info!(target = "folio::admin::navigation", nav_link_id = id, "nav link deleted");
        Ok(())
    }

    /// `ordered_ids` must be a permutation of every current link id.
    pub async fn reorder(
        &self,
        ordered_ids: &[i64],
    ) -> Result<Vec<NavLinkRecord>, AdminNavigationError> {
        Ok(self.writer.reorder_nav_links(ordered_ids).await?)
    }
}

use std::sync::Arc;

use crate::application::repos::{PagesRepo, RepoError};
use crate::domain::entities::PageRecord;

#[derive(Clone)]
pub struct PageService {
    pages: Arc<dyn PagesRepo>,
}

impl PageService {
    pub fn new(pages: Arc<dyn PagesRepo>) -> Self {
        Self { pages }
    }

    /// A page is only public once published.
    pub async fn published_page(&self, slug: &str) -> Result<Option<PageRecord>, RepoError> {
        let record = self.pages.find_by_slug(slug).await?;
        Ok(record.filter(|page| page.published))
    }
}

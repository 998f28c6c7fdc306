//! Site chrome shown on every public page: navigation, social links, profile.

use std::sync::Arc;

use crate::application::repos::{NavLinksRepo, ProfileRepo, RepoError, SocialLinksRepo};
use crate::domain::entities::{NavLinkRecord, SiteProfileRecord, SocialLinkRecord};

#[derive(Clone)]
pub struct ChromeService {
    navigation: Arc<dyn NavLinksRepo>,
    social: Arc<dyn SocialLinksRepo>,
    profile: Arc<dyn ProfileRepo>,
}

impl ChromeService {
    pub fn new(
        navigation: Arc<dyn NavLinksRepo>,
        social: Arc<dyn SocialLinksRepo>,
        profile: Arc<dyn ProfileRepo>,
    ) -> Self {
        Self {
            navigation,
            social,
            profile,
        }
    }

    /// Custom links plus links to published pages, by position.
    pub async fn visible_nav_links(&self) -> Result<Vec<NavLinkRecord>, RepoError> {
        let links = self.navigation.list_nav_links().await?;
        Ok(links
            .into_iter()
            .filter(|link| link.destination.is_visible())
            .collect())
    }

    pub async fn social_links(&self) -> Result<Vec<SocialLinkRecord>, RepoError> {
        self.social.list_social_links().await
    }

    pub async fn profile(&self) -> Result<SiteProfileRecord, RepoError> {
        Ok(self.profile.load_profile().await?.unwrap_or_default())
    }
}

use std::sync::Arc;

use crate::application::admin::navigation::AdminNavigationService;
use crate::application::admin::pages::AdminPageService;
use crate::application::admin::posts::AdminPostService;
use crate::application::admin::profile::AdminProfileService;
use crate::application::admin::social::AdminSocialService;
use crate::application::admin::tags::AdminTagService;
use crate::application::admin::travels::AdminTravelService;
use crate::application::auth::{AuthService, TokenConfig};
use crate::application::chrome::ChromeService;
use crate::application::feed::FeedService;
use crate::application::page::PageService;
use crate::application::travels::TravelService;
use crate::application::upstream::letterboxd::LetterboxdService;
use crate::application::upstream::rawg::RawgService;
use crate::infra::db::PostgresRepositories;
use crate::infra::uploads::UploadStorage;

#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub feed: Arc<FeedService>,
    pub pages: Arc<PageService>,
    pub chrome: Arc<ChromeService>,
    pub travels: Arc<TravelService>,
    pub admin_posts: Arc<AdminPostService>,
    pub admin_tags: Arc<AdminTagService>,
    pub admin_pages: Arc<AdminPageService>,
    pub admin_navigation: Arc<AdminNavigationService>,
    pub admin_social: Arc<AdminSocialService>,
    pub admin_travels: Arc<AdminTravelService>,
    pub admin_profile: Arc<AdminProfileService>,
    pub letterboxd: Arc<LetterboxdService>,
    pub rawg: Arc<RawgService>,
    pub upload_storage: Arc<UploadStorage>,
    pub db: Arc<PostgresRepositories>,
}

impl ApiState {
    /// Wire every service onto the shared repositories.
    pub fn new(
        db: Arc<PostgresRepositories>,
        tokens: TokenConfig,
        upload_storage: Arc<UploadStorage>,
        letterboxd: Arc<LetterboxdService>,
        rawg: Arc<RawgService>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(db.clone(), tokens)),
            feed: Arc::new(FeedService::new(db.clone(), db.clone())),
            pages: Arc::new(PageService::new(db.clone())),
            chrome: Arc::new(ChromeService::new(db.clone(), db.clone(), db.clone())),
            travels: Arc::new(TravelService::new(db.clone())),
            admin_posts: Arc::new(AdminPostService::new(db.clone(), db.clone(), db.clone())),
            admin_tags: Arc::new(AdminTagService::new(db.clone(), db.clone())),
            admin_pages: Arc::new(AdminPageService::new(db.clone(), db.clone())),
            admin_navigation: Arc::new(AdminNavigationService::new(
                db.clone(),
                db.clone(),
                db.clone(),
            )),
            admin_social: Arc::new(AdminSocialService::new(db.clone(), db.clone())),
            admin_travels: Arc::new(AdminTravelService::new(db.clone())),
            admin_profile: Arc::new(AdminProfileService::new(db.clone())),
            letterboxd,
            rawg,
            upload_storage,
            db,
        }
    }
}

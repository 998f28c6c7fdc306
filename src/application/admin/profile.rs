use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::admin::trimmed;
use crate::application::repos::{ProfileRepo, RepoError};
use crate::domain::entities::SiteProfileRecord;

/// URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/api/uploads";

#[derive(Debug, Error)]
pub enum AdminProfileError {
    #[error("unsupported image type `{0}`")]
    UnsupportedImage(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// File extension for an accepted profile photo content type.
pub fn photo_extension(content_type: &str) -> Result<&'static str, AdminProfileError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        _ => Err(AdminProfileError::UnsupportedImage(content_type.to_string())),
    }
}

#[derive(Clone)]
pub struct AdminProfileService {
    repo: Arc<dyn ProfileRepo>,
}

impl AdminProfileService {
    pub fn new(repo: Arc<dyn ProfileRepo>) -> Self {
        Self { repo }
    }

    /// Replace both fields; blank values clear them.
    pub async fn update_profile(
        &self,
        photo_url: Option<String>,
        bio: Option<String>,
    ) -> Result<SiteProfileRecord, AdminProfileError> {
        let profile = SiteProfileRecord {
            photo_url: trimmed(photo_url),
            bio: trimmed(bio),
        };
        let stored = self.repo.upsert_profile(&profile).await?;
        info!(target = "folio::admin::profile", "profile updated");
        Ok(stored)
    }

    /// Point the profile at a freshly stored upload.
    pub async fn attach_photo(&self, file_name: &str) -> Result<SiteProfileRecord, AdminProfileError> {
        let url = format!("{UPLOADS_URL_PREFIX}/{file_name}");
        let stored = self.repo.set_photo_url(&url).await?;
        info!(target = "folio::admin::profile", photo_url = %url, "profile photo replaced");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryProfile {
        profile: Mutex<Option<SiteProfileRecord>>,
    }

    #[async_trait]
    impl ProfileRepo for MemoryProfile {
        async fn load_profile(&self) -> Result<Option<SiteProfileRecord>, RepoError> {
            Ok(self.profile.lock().await.clone())
        }

        async fn upsert_profile(
            &self,
            profile: &SiteProfileRecord,
        ) -> Result<SiteProfileRecord, RepoError> {
            *self.profile.lock().await = Some(profile.clone());
            Ok(profile.clone())
        }

        async fn set_photo_url(&self, photo_url: &str) -> Result<SiteProfileRecord, RepoError> {
            let mut guard = self.profile.lock().await;
            let profile = guard.get_or_insert_with(SiteProfileRecord::default);
            profile.photo_url = Some(photo_url.to_string());
            Ok(profile.clone())
        }
    }

    #[test]
    fn accepted_types_map_to_extensions() {
        assert_eq!(photo_extension("image/jpeg").expect("jpeg"), "jpg");
        assert_eq!(photo_extension("image/PNG").expect("png"), "png");
        assert_eq!(photo_extension("image/webp; q=1").expect("webp"), "webp");
        assert!(matches!(
            photo_extension("image/svg+xml"),
            Err(AdminProfileError::UnsupportedImage(_))
        ));
        assert!(photo_extension("application/pdf").is_err());
    }

    #[tokio::test]
    async fn photo_attach_keeps_bio() {
        let service = AdminProfileService::new(Arc::new(MemoryProfile::default()));
        service
            .update_profile(None, Some("  Hello there  ".into()))
            .await
            .expect("bio");
        let profile = service.attach_photo("profile.png").await.expect("photo");
        assert_eq!(profile.photo_url.as_deref(), Some("/api/uploads/profile.png"));
        assert_eq!(profile.bio.as_deref(), Some("Hello there"));
    }
}

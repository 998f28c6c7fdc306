use async_trait::async_trait;

use crate::application::repos::{ProfileRepo, RepoError};
use crate::domain::entities::SiteProfileRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    photo_url: Option<String>,
    bio: Option<String>,
}

impl From<ProfileRow> for SiteProfileRecord {
    fn from(row: ProfileRow) -> Self {
        Self {
            photo_url: row.photo_url,
            bio: row.bio,
        }
    }
}

#[async_trait]
impl ProfileRepo for PostgresRepositories {
    async fn load_profile(&self) -> Result<Option<SiteProfileRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT photo_url, bio FROM site_profile WHERE id = 1",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SiteProfileRecord::from))
    }

    async fn upsert_profile(
        &self,
        profile: &SiteProfileRecord,
    ) -> Result<SiteProfileRecord, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO site_profile (id, photo_url, bio) VALUES (1, $1, $2) \
             ON CONFLICT (id) DO UPDATE SET photo_url = EXCLUDED.photo_url, bio = EXCLUDED.bio \
             RETURNING photo_url, bio",
        )
        .bind(profile.photo_url.as_deref())
        .bind(profile.bio.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(SiteProfileRecord::from(row))
    }

    async fn set_photo_url(&self, photo_url: &str) -> Result<SiteProfileRecord, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO site_profile (id, photo_url) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET photo_url = EXCLUDED.photo_url \
             RETURNING photo_url, bio",
        )
        .bind(photo_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(SiteProfileRecord::from(row))
    }
}

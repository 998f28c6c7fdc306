use async_trait::async_trait;

use crate::application::repos::{MediaReferenceRepo, RepoError};
use crate::domain::types::MediaType;

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl MediaReferenceRepo for PostgresRepositories {
    async fn is_referenced(
        &self,
        media_type: MediaType,
        external_id: &str,
    ) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM post_media WHERE media_type = $1 AND external_id = $2 \
             )",
        )
        .bind(media_type)
        .bind(external_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::application::repos::{RepoError, SocialLinksRepo, SocialLinksWriteRepo};
use crate::domain::entities::SocialLinkRecord;

use super::ordering::{self, SOCIAL_LINKS};
use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SocialLinkRow {
    id: i64,
    platform: String,
    url: String,
    position: i32,
}

impl From<SocialLinkRow> for SocialLinkRecord {
    fn from(row: SocialLinkRow) -> Self {
        Self {
            id: row.id,
            platform: row.platform,
            url: row.url,
            position: row.position,
        }
    }
}

async fn fetch_links(conn: &mut PgConnection) -> Result<Vec<SocialLinkRecord>, RepoError> {
    let rows = sqlx::query_as::<_, SocialLinkRow>(
        "SELECT id, platform, url, position FROM social_links ORDER BY position",
    )
    .fetch_all(conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(SocialLinkRecord::from).collect())
}

#[async_trait]
impl SocialLinksRepo for PostgresRepositories {
    async fn list_social_links(&self) -> Result<Vec<SocialLinkRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        fetch_links(&mut conn).await
    }
}

#[async_trait]
impl SocialLinksWriteRepo for PostgresRepositories {
    async fn append_social_link(
        &self,
        platform: &str,
        url: &str,
    ) -> Result<SocialLinkRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        ordering::lock(&mut tx, SOCIAL_LINKS).await?;
        let position = ordering::append_position(&mut tx, SOCIAL_LINKS).await?;

        let row = sqlx::query_as::<_, SocialLinkRow>(
            "INSERT INTO social_links (platform, url, position) \
             VALUES ($1, $2, $3) \
             RETURNING id, platform, url, position",
        )
        .bind(platform)
        .bind(url)
        .bind(position)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(SocialLinkRecord::from(row))
    }

    async fn delete_social_link(&self, id: i64) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        ordering::lock(&mut tx, SOCIAL_LINKS).await?;
        ordering::delete_and_compact(&mut tx, SOCIAL_LINKS, id).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn reorder_social_links(
        &self,
        ordered_ids: &[i64],
    ) -> Result<Vec<SocialLinkRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        ordering::lock(&mut tx, SOCIAL_LINKS).await?;
        ordering::reorder(&mut tx, SOCIAL_LINKS, ordered_ids).await?;
        let links = fetch_links(&mut tx).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(links)
    }
}

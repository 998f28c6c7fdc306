use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{
    CreatePageParams, PagesRepo, PagesWriteRepo, RepoError, UpdatePageParams,
};
use crate::domain::entities::PageRecord;

use super::ordering::{self, NAV_LINKS};
use super::{PostgresRepositories, map_sqlx_error};

const PAGE_COLUMNS: &str = "id, title, slug, content, published, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PageRow {
    id: i64,
    title: String,
    slug: String,
    content: String,
    published: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PageRow> for PageRecord {
    fn from(row: PageRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PagesRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<PageRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages ORDER BY title, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PageRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PageRecord>, RepoError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PageRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PageRecord>, RepoError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PageRecord::from))
    }
}

#[async_trait]
impl PagesWriteRepo for PostgresRepositories {
    async fn create_page(&self, params: CreatePageParams) -> Result<PageRecord, RepoError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "INSERT INTO pages (title, slug, content, published) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PAGE_COLUMNS}"
        ))
        .bind(&params.title)
        .bind(&params.slug)
        .bind(&params.content)
        .bind(params.published)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PageRecord::from(row))
    }

    async fn update_page(&self, params: UpdatePageParams) -> Result<PageRecord, RepoError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "UPDATE pages \
             SET title = $2, slug = $3, content = $4, published = $5, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PAGE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.slug)
        .bind(&params.content)
        .bind(params.published)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PageRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_page(&self, id: i64) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        // The nav link goes with the page (ON DELETE CASCADE), so the nav
        // table is locked and compacted in the same transaction.
        ordering::lock(&mut tx, NAV_LINKS).await?;

        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        ordering::compact(&mut tx, NAV_LINKS).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }
}

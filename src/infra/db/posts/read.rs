use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::application::pagination::PageRequest;
use crate::application::repos::{PostQueryFilter, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;
use crate::infra::db::util::convert_count;

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostRow, hydrate};

impl PostgresRepositories {
    fn push_published_filter<'q>(
        qb: &mut QueryBuilder<'q, sqlx::Postgres>,
        filter: &'q PostQueryFilter,
    ) {
        qb.push(" WHERE p.published = TRUE ");
        if let Some(tag) = filter.tag.as_ref() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt INNER JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.slug = ",
            );
            qb.push_bind(tag);
            qb.push(")");
        }
    }

    async fn fetch_posts(&self, sql: &str, bind: Option<&str>) -> Result<Vec<PostRow>, RepoError> {
        let mut query = sqlx::query_as::<_, PostRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        query.fetch_all(self.pool()).await.map_err(map_sqlx_error)
    }

    pub(super) async fn load_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(hydrate(self.pool(), vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_published(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostRecord>, u64), RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        Self::push_published_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts p"));
        Self::push_published_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let posts = hydrate(self.pool(), rows).await?;
        Ok((posts, convert_count(total)?))
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows = self
            .fetch_posts(
                &format!("SELECT {POST_COLUMNS} FROM posts p ORDER BY p.created_at DESC, p.id DESC"),
                None,
            )
            .await?;
        hydrate(self.pool(), rows).await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let rows = self
            .fetch_posts(
                &format!(
                    "SELECT {POST_COLUMNS} FROM posts p WHERE p.slug = $1 AND p.published = TRUE"
                ),
                Some(slug),
            )
            .await?;
        Ok(hydrate(self.pool(), rows).await?.pop())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        self.load_post(id).await
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

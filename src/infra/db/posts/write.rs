use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};

use crate::application::repos::{
    CreatePostParams, PostMediaParams, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;

async fn replace_tags(
    conn: &mut PgConnection,
    post_id: i64,
    tag_ids: &[i64],
) -> Result<(), RepoError> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO post_tags (post_id, tag_id) \
         SELECT $1, tag_id FROM UNNEST($2::bigint[]) AS tag_id \
         ON CONFLICT DO NOTHING",
    )
    .bind(post_id)
    .bind(tag_ids)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

async fn replace_media(
    conn: &mut PgConnection,
    post_id: i64,
    media: &[PostMediaParams],
) -> Result<(), RepoError> {
    sqlx::query("DELETE FROM post_media WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    for (position, item) in media.iter().enumerate() {
        let position = i32::try_from(position)
            .map_err(|_| RepoError::from_persistence("too many media entries"))?;
        sqlx::query(
            "INSERT INTO post_media \
             (post_id, media_type, external_id, title, background_image_url, position) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(post_id)
        .bind(item.media_type)
        .bind(&item.external_id)
        .bind(&item.title)
        .bind(item.background_image_url.as_deref())
        .bind(position)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    }
    Ok(())
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), RepoError> {
    tx.commit().await.map_err(map_sqlx_error)
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            slug,
            title,
            content,
            excerpt,
            published,
            tag_ids,
            media,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (title, slug, content, excerpt, published) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(&title)
        .bind(&slug)
        .bind(&content)
        .bind(excerpt.as_deref())
        .bind(published)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        replace_tags(&mut tx, id, &tag_ids).await?;
        replace_media(&mut tx, id, &media).await?;
        commit(tx).await?;

        self.load_post(id).await?.ok_or(RepoError::NotFound)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            content,
            excerpt,
            published,
            tag_ids,
            media,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE posts \
             SET title = $2, content = $3, excerpt = $4, published = $5, updated_at = now() \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(&title)
        .bind(&content)
        .bind(excerpt.as_deref())
        .bind(published)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if updated.is_none() {
            return Err(RepoError::NotFound);
        }

        if let Some(tag_ids) = tag_ids.as_deref() {
            replace_tags(&mut tx, id, tag_ids).await?;
        }
        if let Some(media) = media.as_deref() {
            replace_media(&mut tx, id, media).await?;
        }
        commit(tx).await?;

        self.load_post(id).await?.ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

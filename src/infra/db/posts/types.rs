use std::collections::HashMap;

use sqlx::PgPool;
use time::OffsetDateTime;

use crate::application::repos::RepoError;
use crate::domain::entities::{PostMediaRecord, PostRecord, TagRecord};
use crate::domain::types::MediaType;
use crate::infra::db::map_sqlx_error;

pub(super) const POST_COLUMNS: &str =
    "p.id, p.title, p.slug, p.content, p.excerpt, p.published, p.created_at, p.updated_at";

#[derive(sqlx::FromRow)]
pub(super) struct PostRow {
    pub(super) id: i64,
    pub(super) title: String,
    pub(super) slug: String,
    pub(super) content: String,
    pub(super) excerpt: Option<String>,
    pub(super) published: bool,
    pub(super) created_at: OffsetDateTime,
    pub(super) updated_at: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    id: i64,
    name: String,
    slug: String,
}

#[derive(sqlx::FromRow)]
struct PostMediaRow {
    post_id: i64,
    id: i64,
    media_type: MediaType,
    external_id: String,
    title: String,
    background_image_url: Option<String>,
}

impl PostRow {
    fn into_record(self, tags: Vec<TagRecord>, media: Vec<PostMediaRecord>) -> PostRecord {
        PostRecord {
            id: self.id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags,
            media,
        }
    }
}

/// Attach tags (by name) and media (in stored order) to a page of post rows.
pub(super) async fn hydrate(pool: &PgPool, rows: Vec<PostRow>) -> Result<Vec<PostRecord>, RepoError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let tag_rows = sqlx::query_as::<_, PostTagRow>(
        "SELECT pt.post_id, t.id, t.name, t.slug \
         FROM post_tags pt \
         INNER JOIN tags t ON t.id = pt.tag_id \
         WHERE pt.post_id = ANY($1) \
         ORDER BY t.name",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_error)?;

    let media_rows = sqlx::query_as::<_, PostMediaRow>(
        "SELECT post_id, id, media_type, external_id, title, background_image_url \
         FROM post_media \
         WHERE post_id = ANY($1) \
         ORDER BY position, id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_error)?;

    let mut tags: HashMap<i64, Vec<TagRecord>> = HashMap::new();
    for row in tag_rows {
        tags.entry(row.post_id).or_default().push(TagRecord {
            id: row.id,
            name: row.name,
            slug: row.slug,
        });
    }

    let mut media: HashMap<i64, Vec<PostMediaRecord>> = HashMap::new();
    for row in media_rows {
        media.entry(row.post_id).or_default().push(PostMediaRecord {
            id: row.id,
            post_id: row.post_id,
            media_type: row.media_type,
            external_id: row.external_id,
            title: row.title,
            background_image_url: row.background_image_url,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let post_tags = tags.remove(&row.id).unwrap_or_default();
            let post_media = media.remove(&row.id).unwrap_or_default();
            row.into_record(post_tags, post_media)
        })
        .collect())
}

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::application::repos::{NavLinksRepo, NavLinksWriteRepo, RepoError};
use crate::domain::entities::NavLinkRecord;
use crate::domain::navigation::{NavDestination, NavTarget};

use super::ordering::{self, NAV_LINKS};
use super::{PostgresRepositories, map_sqlx_error};

const NAV_LINK_SELECT: &str = "SELECT n.id, n.position, n.page_id, \
        p.title AS page_title, p.slug AS page_slug, p.published AS page_published, \
        n.custom_label, n.custom_url \
     FROM nav_links n \
     LEFT JOIN pages p ON p.id = n.page_id";

#[derive(sqlx::FromRow)]
struct NavLinkRow {
    id: i64,
    position: i32,
    page_id: Option<i64>,
    page_title: Option<String>,
    page_slug: Option<String>,
    page_published: Option<bool>,
    custom_label: Option<String>,
    custom_url: Option<String>,
}

impl TryFrom<NavLinkRow> for NavLinkRecord {
    type Error = RepoError;

    fn try_from(row: NavLinkRow) -> Result<Self, Self::Error> {
        let NavLinkRow {
            id,
            position,
            page_id,
            page_title,
            page_slug,
            page_published,
            custom_label,
            custom_url,
        } = row;

        let destination = match (page_id, page_title, page_slug, page_published) {
            (Some(page_id), Some(title), Some(slug), Some(published)) => NavDestination::Page {
                page_id,
                title,
                slug,
                published,
            },
            (None, ..) => match (custom_label, custom_url) {
                (Some(label), Some(url)) => NavDestination::Custom { label, url },
                _ => return Err(unresolvable(id)),
            },
            _ => return Err(unresolvable(id)),
        };

        Ok(Self {
            id,
            position,
            destination,
        })
    }
}

fn unresolvable(id: i64) -> RepoError {
    RepoError::Integrity {
        message: format!("nav link {id} has no resolvable target"),
    }
}

async fn fetch_links(conn: &mut PgConnection) -> Result<Vec<NavLinkRecord>, RepoError> {
    let rows = sqlx::query_as::<_, NavLinkRow>(&format!(
        "{NAV_LINK_SELECT} ORDER BY n.position"
    ))
    .fetch_all(conn)
    .await
    .map_err(map_sqlx_error)?;

    rows.into_iter().map(NavLinkRecord::try_from).collect()
}

#[async_trait]
impl NavLinksRepo for PostgresRepositories {
    async fn list_nav_links(&self) -> Result<Vec<NavLinkRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        fetch_links(&mut conn).await
    }

    async fn find_by_page(&self, page_id: i64) -> Result<Option<NavLinkRecord>, RepoError> {
        let row = sqlx::query_as::<_, NavLinkRow>(&format!(
            "{NAV_LINK_SELECT} WHERE n.page_id = $1"
        ))
        .bind(page_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(NavLinkRecord::try_from).transpose()
    }
}

#[async_trait]
impl NavLinksWriteRepo for PostgresRepositories {
    async fn append_nav_link(&self, target: NavTarget) -> Result<NavLinkRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        ordering::lock(&mut tx, NAV_LINKS).await?;
        let position = ordering::append_position(&mut tx, NAV_LINKS).await?;

        let (page_id, label, url) = match &target {
            NavTarget::Page { page_id } => (Some(*page_id), None, None),
            NavTarget::Custom { label, url } => (None, Some(label.as_str()), Some(url.as_str())),
        };

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO nav_links (page_id, custom_label, custom_url, position) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(page_id)
        .bind(label)
        .bind(url)
        .bind(position)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, NavLinkRow>(&format!("{NAV_LINK_SELECT} WHERE n.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        NavLinkRecord::try_from(row)
    }

    async fn delete_nav_link(&self, id: i64) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        ordering::lock(&mut tx, NAV_LINKS).await?;
        ordering::delete_and_compact(&mut tx, NAV_LINKS, id).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn reorder_nav_links(
        &self,
        ordered_ids: &[i64],
    ) -> Result<Vec<NavLinkRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        ordering::lock(&mut tx, NAV_LINKS).await?;
        ordering::reorder(&mut tx, NAV_LINKS, ordered_ids).await?;
        let links = fetch_links(&mut tx).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(links)
    }
}

//! Shared statements for tables that keep a dense `position` column.
//!
//! Every helper runs inside the caller's transaction after [`lock`]; the
//! `position` unique constraints are deferred so intermediate states may
//! collide until commit.

use sqlx::{Postgres, Transaction};

use crate::application::repos::RepoError;
use crate::domain::ordering::{Placement, next_position, plan_reorder};

use super::map_sqlx_error;

/// A positioned table. Names are fixed identifiers, never user input.
#[derive(Debug, Clone, Copy)]
pub(super) struct Positioned(&'static str);

pub(super) const NAV_LINKS: Positioned = Positioned("nav_links");
pub(super) const SOCIAL_LINKS: Positioned = Positioned("social_links");

impl Positioned {
    pub(super) fn table(self) -> &'static str {
        self.0
    }
}

/// Serialize writers on the table while still letting plain reads through.
pub(super) async fn lock(
    tx: &mut Transaction<'_, Postgres>,
    table: Positioned,
) -> Result<(), RepoError> {
    sqlx::query(&format!(
        "LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE",
        table.table()
    ))
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

pub(super) async fn append_position(
    tx: &mut Transaction<'_, Postgres>,
    table: Positioned,
) -> Result<i32, RepoError> {
    let max: Option<i32> = sqlx::query_scalar(&format!(
        "SELECT MAX(position) FROM {}",
        table.table()
    ))
    .fetch_one(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;
    Ok(next_position(max))
}

/// Renumber the rows `1..N`, preserving their current relative order.
pub(super) async fn compact(
    tx: &mut Transaction<'_, Postgres>,
    table: Positioned,
) -> Result<(), RepoError> {
    sqlx::query(&format!(
        "UPDATE {table} AS t SET position = ranked.rn::int \
         FROM (SELECT id, ROW_NUMBER() OVER (ORDER BY position, id) AS rn FROM {table}) AS ranked \
         WHERE t.id = ranked.id AND t.position <> ranked.rn",
        table = table.table()
    ))
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

/// Delete one row and close the gap it leaves.
pub(super) async fn delete_and_compact(
    tx: &mut Transaction<'_, Postgres>,
    table: Positioned,
    id: i64,
) -> Result<(), RepoError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table.table()))
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound);
    }

    compact(tx, table).await
}

/// Validate `ordered_ids` against the stored ids and write the new positions.
pub(super) async fn reorder(
    tx: &mut Transaction<'_, Postgres>,
    table: Positioned,
    ordered_ids: &[i64],
) -> Result<(), RepoError> {
    let current: Vec<i64> = sqlx::query_scalar(&format!(
        "SELECT id FROM {} ORDER BY position",
        table.table()
    ))
    .fetch_all(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;

    let plan = plan_reorder(&current, ordered_ids)?;
    apply(tx, table, &plan).await
}

async fn apply(
    tx: &mut Transaction<'_, Postgres>,
    table: Positioned,
    plan: &[Placement],
) -> Result<(), RepoError> {
    if plan.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = plan.iter().map(|placement| placement.id).collect();
    let positions: Vec<i32> = plan.iter().map(|placement| placement.position).collect();

    sqlx::query(&format!(
        "UPDATE {} AS t SET position = v.position \
         FROM UNNEST($1::bigint[], $2::int[]) AS v(id, position) \
         WHERE t.id = v.id",
        table.table()
    ))
    .bind(ids)
    .bind(positions)
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

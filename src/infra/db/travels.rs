use async_trait::async_trait;

use crate::application::repos::{RepoError, TravelsRepo};
use crate::domain::entities::CountryRecord;
use crate::domain::types::TravelList;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CountryRow {
    id: i64,
    name: String,
    iso_numeric: i32,
}

impl From<CountryRow> for CountryRecord {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            iso_numeric: row.iso_numeric,
        }
    }
}

fn table(list: TravelList) -> &'static str {
    match list {
        TravelList::Visited => "visited_countries",
        TravelList::Wishlist => "wanted_countries",
    }
}

#[async_trait]
impl TravelsRepo for PostgresRepositories {
    async fn list_countries(&self, list: TravelList) -> Result<Vec<CountryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CountryRow>(&format!(
            "SELECT id, name, iso_numeric FROM {} ORDER BY name, id",
            table(list)
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CountryRecord::from).collect())
    }

    async fn add_country(
        &self,
        list: TravelList,
        name: &str,
        iso_numeric: i32,
    ) -> Result<CountryRecord, RepoError> {
        let row = sqlx::query_as::<_, CountryRow>(&format!(
            "INSERT INTO {} (name, iso_numeric) VALUES ($1, $2) RETURNING id, name, iso_numeric",
            table(list)
        ))
        .bind(name)
        .bind(iso_numeric)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CountryRecord::from(row))
    }

    async fn delete_country(&self, list: TravelList, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table(list)))
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

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::admin::require_non_blank;
use crate::application::repos::{RepoError, TravelsRepo};
use crate::domain::entities::CountryRecord;
use crate::domain::types::TravelList;

/// ISO 3166-1 numeric codes are three digits.
pub const ISO_NUMERIC_RANGE: std::ops::RangeInclusive<i32> = 1..=999;

#[derive(Debug, Error)]
pub enum AdminTravelError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("country {iso_numeric} is already on the {list} list")]
    Duplicate {
        list: &'static str,
        iso_numeric: i32,
    },
    #[error("country not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminTravelService {
    travels: Arc<dyn TravelsRepo>,
}

impl AdminTravelService {
    pub fn new(travels: Arc<dyn TravelsRepo>) -> Self {
        Self { travels }
    }

    pub async fn list(&self, list: TravelList) -> Result<Vec<CountryRecord>, AdminTravelError> {
        Ok(self.travels.list_countries(list).await?)
    }

    pub async fn add_country(
        &self,
        list: TravelList,
        name: &str,
        iso_numeric: i32,
    ) -> Result<CountryRecord, AdminTravelError> {
        let name = require_non_blank(name, "name").map_err(AdminTravelError::ConstraintViolation)?;
        if !ISO_NUMERIC_RANGE.contains(&iso_numeric) {
            return Err(AdminTravelError::ConstraintViolation("iso_numeric"));
        }

        match self.travels.add_country(list, &name, iso_numeric).await {
            Ok(country) => {
                info!(
                    target = "folio::admin::travels",
                    list = list.as_str(),
                    iso_numeric,
                    "country added"
                );
                Ok(country)
            }
            Err(RepoError::Duplicate { .. }) => Err(AdminTravelError::Duplicate {
                list: list.as_str(),
                iso_numeric,
            }),
            Err(err) => Err(AdminTravelError::Repo(err)),
        }
    }

    pub async fn delete_country(&self, list: TravelList, id: i64) -> Result<(), AdminTravelError> {
        match self.travels.delete_country(list, id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(AdminTravelError::NotFound),
            Err(err) => Err(AdminTravelError::Repo(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryTravels {
        rows: Mutex<Vec<(TravelList, CountryRecord)>>,
    }

    #[async_trait]
    impl TravelsRepo for MemoryTravels {
        async fn list_countries(&self, list: TravelList) -> Result<Vec<CountryRecord>, RepoError> {
            let rows = self.rows.lock().await;
            let mut countries: Vec<CountryRecord> = rows
                .iter()
                .filter(|(row_list, _)| *row_list == list)
                .map(|(_, country)| country.clone())
                .collect();
            countries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(countries)
        }

        async fn add_country(
            &self,
            list: TravelList,
            name: &str,
            iso_numeric: i32,
        ) -> Result<CountryRecord, RepoError> {
            let mut rows = self.rows.lock().await;
            if rows
                .iter()
                .any(|(row_list, c)| *row_list == list && c.iso_numeric == iso_numeric)
            {
                return Err(RepoError::Duplicate {
                    constraint: "visited_countries_iso_key".into(),
                });
            }
            let country = CountryRecord {
                id: rows.len() as i64 + 1,
                name: name.to_string(),
                iso_numeric,
            };
            rows.push((list, country.clone()));
            Ok(country)
        }

        async fn delete_country(&self, list: TravelList, id: i64) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().await;
            let before = rows.len();
            rows.retain(|(row_list, c)| !(*row_list == list && c.id == id));
            if rows.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }
    }

    fn service() -> AdminTravelService {
        AdminTravelService::new(Arc::new(MemoryTravels::default()))
    }

    #[tokio::test]
    async fn lists_are_independent_and_sorted() {
        let service = service();
        service
            .add_country(TravelList::Visited, "Portugal", 620)
            .await
            .expect("pt");
        service
            .add_country(TravelList::Visited, "Japan", 392)
            .await
            .expect("jp");
        service
            .add_country(TravelList::Wishlist, "Japan", 392)
            .await
            .expect("jp wishlist");

        let visited = service.list(TravelList::Visited).await.expect("visited");
        let names: Vec<&str> = visited.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Japan", "Portugal"]);
        assert_eq!(service.list(TravelList::Wishlist).await.expect("wishlist").len(), 1);
    }

    #[tokio::test]
    async fn duplicate_iso_is_a_conflict() {
        let service = service();
        service
            .add_country(TravelList::Visited, "Japan", 392)
            .await
            .expect("jp");
        let err = service
            .add_country(TravelList::Visited, "Nippon", 392)
            .await
            .expect_err("duplicate");
        assert!(matches!(err, AdminTravelError::Duplicate { iso_numeric: 392, .. }));
    }

    #[tokio::test]
    async fn input_is_validated() {
        let service = service();
        assert!(matches!(
            service.add_country(TravelList::Visited, " ", 392).await,
            Err(AdminTravelError::ConstraintViolation("name"))
        ));
        assert!(matches!(
            service.add_country(TravelList::Visited, "Nowhere", 0).await,
            Err(AdminTravelError::ConstraintViolation("iso_numeric"))
        ));
        assert!(matches!(
            service.delete_country(TravelList::Wishlist, 3).await,
            Err(AdminTravelError::NotFound)
        ));
    }
}

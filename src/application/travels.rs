use std::sync::Arc;

use crate::application::repos::{RepoError, TravelsRepo};
use crate::domain::entities::CountryRecord;
use crate::domain::types::TravelList;

#[derive(Clone)]
pub struct TravelService {
    travels: Arc<dyn TravelsRepo>,
}

impl TravelService {
    pub fn new(travels: Arc<dyn TravelsRepo>) -> Self {
        Self { travels }
    }

    /// Countries on the given list, ordered by name.
    pub async fn countries(&self, list: TravelList) -> Result<Vec<CountryRecord>, RepoError> {
        self.travels.list_countries(list).await
    }
}

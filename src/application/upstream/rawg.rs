//! RAWG game metadata proxy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{FeedCache, UpstreamError, send_checked};
use crate::application::repos::{MediaReferenceRepo, RepoError};
use crate::domain::types::MediaType;

pub const FEED_NAME: &str = "rawg";
pub const SEARCH_PAGE_SIZE: &str = "10";

#[derive(Debug, Error)]
pub enum RawgError {
    #[error("game `{0}` is not referenced by any post")]
    NotReferenced(String),
    #[error("rawg request failed")]
    Upstream(#[source] UpstreamError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl RawgError {
    /// Whether RAWG answered, but with an error status.
    pub fn is_bad_gateway(&self) -> bool {
        matches!(self, RawgError::Upstream(UpstreamError::Status { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSearchHit {
    pub id: String,
    pub name: String,
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameDetails {
    pub id: String,
    pub name: String,
    pub rawg_slug: Option<String>,
    pub description_raw: Option<String>,
    pub released: Option<String>,
    pub background_image: Option<String>,
    pub metacritic: Option<i32>,
    pub metacritic_url: Option<String>,
    pub esrb_rating: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawSearchHit>,
}

#[derive(Deserialize)]
struct RawSearchHit {
    id: i64,
    name: String,
    background_image: Option<String>,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

#[derive(Deserialize)]
struct PlatformEntry {
    platform: Named,
}

#[derive(Deserialize)]
struct RawGame {
    id: i64,
    name: String,
    slug: Option<String>,
    description_raw: Option<String>,
    released: Option<String>,
    background_image: Option<String>,
    metacritic: Option<i32>,
    metacritic_url: Option<String>,
    esrb_rating: Option<Named>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    platforms: Option<Vec<PlatformEntry>>,
    #[serde(default)]
    developers: Vec<Named>,
    #[serde(default)]
    publishers: Vec<Named>,
}

impl From<RawGame> for GameDetails {
    fn from(raw: RawGame) -> Self {
        fn names(values: Vec<Named>) -> Vec<String> {
            values.into_iter().map(|value| value.name).collect()
        }

        Self {
            id: raw.id.to_string(),
            name: raw.name,
            rawg_slug: raw.slug,
            description_raw: raw.description_raw.filter(|text| !text.is_empty()),
            released: raw.released,
            background_image: raw.background_image,
            metacritic: raw.metacritic,
            metacritic_url: raw.metacritic_url.filter(|url| !url.is_empty()),
            esrb_rating: raw.esrb_rating.map(|rating| rating.name),
            genres: names(raw.genres),
            platforms: raw
                .platforms
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry.platform.name)
                .collect(),
            developers: names(raw.developers),
            publishers: names(raw.publishers),
        }
    }
}

pub struct RawgService {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    media: Arc<dyn MediaReferenceRepo>,
    cache: Arc<FeedCache<String, GameDetails>>,
}

impl RawgService {
    pub fn new(
        client: reqwest::Client,
        base_url: Url,
        api_key: Option<String>,
        media: Arc<dyn MediaReferenceRepo>,
        cache: Arc<FeedCache<String, GameDetails>>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            media,
            cache,
        }
    }

    /// Uncached search; a blank query returns nothing without calling out.
    pub async fn search(&self, query: &str) -> Result<Vec<GameSearchHit>, RawgError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = self
            .endpoint(&["games"], &[("search", query), ("page_size", SEARCH_PAGE_SIZE)])
            .map_err(RawgError::Upstream)?;
        let response = send_checked(self.client.get(url))
            .await
            .map_err(RawgError::Upstream)?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| RawgError::Upstream(UpstreamError::Malformed(err.to_string())))?;

        Ok(body
            .results
            .into_iter()
            .map(|hit| GameSearchHit {
                id: hit.id.to_string(),
                name: hit.name,
                background_image: hit.background_image,
            })
            .collect())
    }

    /// Details for a game some post references; anything else is rejected
    /// before the cache or network is consulted.
    pub async fn game(&self, id: &str) -> Result<GameDetails, RawgError> {
        if !self.media.is_referenced(MediaType::Game, id).await? {
            debug!(target = "folio::upstream", game_id = id, "rejected unreferenced game lookup");
            return Err(RawgError::NotReferenced(id.to_string()));
        }

        self.cache
            .get_or_refresh(id.to_string(), || self.fetch_game(id))
            .await
            .map_err(RawgError::Upstream)
    }

    async fn fetch_game(&self, id: &str) -> Result<GameDetails, UpstreamError> {
        let url = self.endpoint(&["games", id], &[])?;
        let response = send_checked(self.client.get(url)).await?;
        let raw: RawGame = response
            .json()
            .await
            .map_err(|err| UpstreamError::Malformed(err.to_string()))?;
        Ok(raw.into())
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, UpstreamError> {
        let key = self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)?;

        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("key", key)
            .extend_pairs(params);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::json;

    use super::super::testing::ManualClock;
    use super::*;

    struct ReferencedGames(Vec<&'static str>);

    #[async_trait]
    impl MediaReferenceRepo for ReferencedGames {
        async fn is_referenced(
            &self,
            media_type: MediaType,
            external_id: &str,
        ) -> Result<bool, RepoError> {
            Ok(media_type == MediaType::Game && self.0.contains(&external_id))
        }
    }

    fn service(server: &MockServer, key: Option<&str>, referenced: Vec<&'static str>) -> RawgService {
        let base = Url::parse(&server.url("/api")).expect("base url");
        let cache = Arc::new(FeedCache::new(
            FEED_NAME,
            Duration::from_secs(3600),
            Arc::new(ManualClock::new()),
        ));
        RawgService::new(
            reqwest::Client::new(),
            base,
            key.map(str::to_string),
            Arc::new(ReferencedGames(referenced)),
            cache,
        )
    }

    #[tokio::test]
    async fn search_maps_hits_and_stringifies_ids() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/games")
                    .query_param("key", "secret")
                    .query_param("search", "zelda")
                    .query_param("page_size", "10");
                then.status(200).json_body(json!({
                    "results": [
                        {"id": 22511, "name": "Breath of the Wild", "background_image": "https://img/botw.jpg"},
                        {"id": 3, "name": "No Image", "background_image": null}
                    ]
                }));
            })
            .await;

        let hits = service(&server, Some("secret"), vec![])
            .search("zelda")
            .await
            .expect("hits");

        mock.assert_async().await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "22511");
        assert_eq!(hits[1].background_image, None);
    }

    #[tokio::test]
    async fn blank_search_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let hits = service(&server, Some("secret"), vec![])
            .search("   ")
            .await
            .expect("empty");
        assert!(hits.is_empty());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn search_error_status_is_bad_gateway() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/games");
                then.status(401);
            })
            .await;

        let err = service(&server, Some("secret"), vec![])
            .search("zelda")
            .await
            .expect_err("status error");
        assert!(err.is_bad_gateway());
    }

    #[tokio::test]
    async fn missing_key_is_unavailable() {
        let server = MockServer::start_async().await;
        let err = service(&server, None, vec![])
            .search("zelda")
            .await
            .expect_err("no key");
        assert!(matches!(err, RawgError::Upstream(UpstreamError::NotConfigured)));
        assert!(!err.is_bad_gateway());
    }

    #[tokio::test]
    async fn unreferenced_game_never_reaches_upstream() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let err = service(&server, Some("secret"), vec!["1"])
            .game("999")
            .await
            .expect_err("gated");
        assert!(matches!(err, RawgError::NotReferenced(id) if id == "999"));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn referenced_game_is_normalized_and_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/games/3498").query_param("key", "secret");
                then.status(200).json_body(json!({
                    "id": 3498,
                    "slug": "grand-theft-auto-v",
                    "name": "Grand Theft Auto V",
                    "description_raw": "Heists.",
                    "released": "2013-09-17",
                    "background_image": "https://img/gta.jpg",
                    "metacritic": 92,
                    "metacritic_url": "",
                    "esrb_rating": {"id": 4, "name": "Mature", "slug": "mature"},
                    "genres": [{"name": "Action"}],
                    "platforms": [{"platform": {"name": "PC"}}, {"platform": {"name": "PlayStation 5"}}],
                    "developers": [{"name": "Rockstar North"}],
                    "publishers": [{"name": "Rockstar Games"}]
                }));
            })
            .await;

        let service = service(&server, Some("secret"), vec!["3498"]);
        let details = service.game("3498").await.expect("details");
        let again = service.game("3498").await.expect("cached");

        assert_eq!(details, again);
        assert_eq!(details.id, "3498");
        assert_eq!(details.rawg_slug.as_deref(), Some("grand-theft-auto-v"));
        assert_eq!(details.metacritic, Some(92));
        assert_eq!(details.metacritic_url, None);
        assert_eq!(details.esrb_rating.as_deref(), Some("Mature"));
        assert_eq!(details.platforms, ["PC", "PlayStation 5"]);
        mock.assert_hits_async(1).await;
    }
}

//! Recently watched films from a Letterboxd RSS feed.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use roxmltree::{Document, Node};
use serde::Serialize;
use thiserror::Error;

use super::{FeedCache, UpstreamError, send_checked};

pub const FEED_NAME: &str = "letterboxd";
pub const MAX_FILMS: usize = 5;
const LETTERBOXD_NS: &str = "https://letterboxd.com";
const CACHE_KEY: &str = "recent";

static POSTER_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img src="([^"]+)""#).expect("poster regex is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Film {
    pub title: String,
    pub year: Option<i32>,
    pub rating: f64,
    pub url: String,
    pub poster_url: Option<String>,
}

#[derive(Debug, Error)]
#[error("letterboxd feed unavailable")]
pub struct LetterboxdError(#[source] pub UpstreamError);

pub struct LetterboxdService {
    client: reqwest::Client,
    feed_url: String,
    cache: Arc<FeedCache<String, Vec<Film>>>,
}

impl LetterboxdService {
    pub fn new(
        client: reqwest::Client,
        feed_url: impl Into<String>,
        cache: Arc<FeedCache<String, Vec<Film>>>,
    ) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
            cache,
        }
    }

    pub async fn recent_films(&self) -> Result<Vec<Film>, LetterboxdError> {
        self.cache
            .get_or_refresh(CACHE_KEY.to_string(), || self.fetch())
            .await
            .map_err(LetterboxdError)
    }

    async fn fetch(&self) -> Result<Vec<Film>, UpstreamError> {
        let response = send_checked(self.client.get(&self.feed_url)).await?;
        let body = response.text().await.map_err(UpstreamError::Transport)?;
        parse_feed(&body)
    }
}

/// Rated items from `channel/item`, in document order, at most [`MAX_FILMS`].
pub fn parse_feed(xml: &str) -> Result<Vec<Film>, UpstreamError> {
    let document = Document::parse(xml).map_err(|err| UpstreamError::Malformed(err.to_string()))?;
    let Some(channel) = document
        .root_element()
        .children()
        .find(|node| node.has_tag_name("channel"))
    else {
        return Ok(Vec::new());
    };

    Ok(channel
        .children()
        .filter(|node| node.has_tag_name("item"))
        .filter_map(parse_item)
        .take(MAX_FILMS)
        .collect())
}

fn parse_item(item: Node<'_, '_>) -> Option<Film> {
    let rating = child_text(item, Some(LETTERBOXD_NS), "memberRating")?
        .trim()
        .parse::<f64>()
        .ok()?;

    let title = child_text(item, Some(LETTERBOXD_NS), "filmTitle")
        .unwrap_or_default()
        .to_string();
    let year = child_text(item, Some(LETTERBOXD_NS), "filmYear")
        .and_then(|value| value.trim().parse::<i32>().ok());
    let url = child_text(item, None, "link")
        .unwrap_or_default()
        .trim()
        .to_string();
    let poster_url = child_text(item, None, "description").and_then(|description| {
        POSTER_SRC
            .captures(description)
            .and_then(|captures| captures.get(1))
            .map(|src| src.as_str().to_string())
    });

    Some(Film {
        title,
        year,
        rating,
        url,
        poster_url,
    })
}

fn child_text<'a>(node: Node<'a, '_>, namespace: Option<&str>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| {
            child.is_element()
                && child.tag_name().name() == name
                && child.tag_name().namespace() == namespace
        })
        .and_then(|child| child.text())
}

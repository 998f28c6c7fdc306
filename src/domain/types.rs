//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "media_type", rename_all = "snake_case")]
pub enum MediaType {
    Game,
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Game => "game",
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

/// Which travel list a country belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelList {
    Visited,
    Wishlist,
}

impl TravelList {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelList::Visited => "visited",
            TravelList::Wishlist => "wishlist",
        }
    }
}

//! Data models for the catalog browser.
//!
//! This module defines the catalog structures shared by the search pipeline,
//! the listing pages and the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of catalog being browsed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Anime,
    Manga,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Anime => "anime",
            MediaType::Manga => "manga",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a path segment is neither `anime` nor `manga`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid media type: {0} (expected anime or manga)")]
pub struct InvalidMediaType(pub String);

impl std::str::FromStr for MediaType {
    type Err = InvalidMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anime" => Ok(MediaType::Anime),
            "manga" => Ok(MediaType::Manga),
            _ => Err(InvalidMediaType(s.to_string())),
        }
    }
}

/// One anime or manga entry as listed by the upstream catalog
///
/// Only `id` and `title` are guaranteed. Everything else may be missing and
/// consumers substitute a neutral value instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub id: u32, // MyAnimeList ID
    pub title: String,
    pub title_english: Option<String>,

    /// TV, Movie, OVA, Manga, Light Novel, ...
    pub kind: Option<String>,
    pub status: Option<String>,
    /// Content rating label, anime only
    pub rating: Option<String>,
    /// Lowercase season name, anime only
    pub season: Option<String>,
    pub year: Option<i32>,

    // Scores and rankings
    pub score: Option<f64>,
    pub popularity: Option<u32>,
    pub rank: Option<u32>,

    // Links
    pub image_url: Option<String>,
    pub url: Option<String>,
}

impl CatalogRecord {
    /// Minimal record with only the mandatory fields set
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            title_english: None,
            kind: None,
            status: None,
            rating: None,
            season: None,
            year: None,
            score: None,
            popularity: None,
            rank: None,
            image_url: None,
            url: None,
        }
    }
}

/// Full detail page for a single entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDetails {
    pub media_type: MediaType,
    pub record: CatalogRecord,

    pub title_japanese: Option<String>,
    pub synopsis: Option<String>,
    pub background: Option<String>,

    // Anime
    pub episodes: Option<u32>,
    pub duration: Option<String>,
    pub studios: Vec<String>,

    // Manga
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
    pub authors: Vec<String>,

    /// Aired (anime) or published (manga) date range, as displayed upstream
    pub run: Option<String>,
    pub members: Option<u32>,
    pub favorites: Option<u32>,
    pub genres: Vec<String>,
    pub themes: Vec<String>,
}

/// Manga magazine entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Magazine {
    pub id: u32,
    pub name: String,
    pub count: u32,
    pub url: String,
}

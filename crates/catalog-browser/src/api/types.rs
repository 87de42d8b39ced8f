//! Jikan API v4 response types.
//!
//! These types represent the JSON responses from the Jikan API. Anime and
//! manga entries share one shape; fields that only exist for one of them
//! are simply absent for the other.

use serde::{Deserialize, Serialize};
use shared::{CatalogDetails, CatalogRecord, Magazine, MediaType};

/// List wrapper, optionally paginated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Single item wrapper
///
/// `data` is optional because a missing payload is reported as "not found"
/// rather than a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// Anime or manga entry as returned by search, top, random and detail endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub mal_id: u32,
    pub url: Option<String>,
    pub images: Option<Images>,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub rating: Option<String>,
    pub season: Option<String>,
    pub year: Option<i32>,

    // Scores and rankings
    pub score: Option<f64>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u32>,
    pub favorites: Option<u32>,

    // Synopsis
    pub synopsis: Option<String>,
    pub background: Option<String>,

    // Anime only
    pub episodes: Option<u32>,
    pub duration: Option<String>,
    pub aired: Option<DateRange>,
    pub studios: Vec<MalEntity>,

    // Manga only
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
    pub published: Option<DateRange>,
    pub authors: Vec<MalEntity>,

    pub genres: Vec<MalEntity>,
    pub themes: Vec<MalEntity>,
}

/// Cover images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Images {
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Aired or published dates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Human readable range, e.g. "Apr 3, 1998 to Apr 24, 1999"
    pub string: Option<String>,
}

/// MAL entity (genre, studio, author, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Magazine item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagazineItem {
    pub mal_id: u32,
    pub name: String,
    pub url: String,
    pub count: u32,
}

/// Error response from Jikan API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanError {
    pub status: u16,
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

impl CatalogEntry {
    /// Preferred cover image: large JPEG, falling back to the default size
    fn cover_url(&self) -> Option<String> {
        let jpg = &self.images.as_ref()?.jpg;
        jpg.large_image_url.clone().or_else(|| jpg.image_url.clone())
    }

    /// Map into the detail page model
    pub fn into_details(self, media_type: MediaType) -> CatalogDetails {
        let names = |entities: &[MalEntity]| -> Vec<String> {
            entities.iter().map(|e| e.name.clone()).collect()
        };
        let run = match media_type {
            MediaType::Anime => self.aired.as_ref(),
            MediaType::Manga => self.published.as_ref(),
        }
        .and_then(|range| range.string.clone());

        CatalogDetails {
            media_type,
            title_japanese: self.title_japanese.clone(),
            synopsis: self.synopsis.clone(),
            background: self.background.clone(),
            episodes: self.episodes,
            duration: self.duration.clone(),
            studios: names(&self.studios),
            chapters: self.chapters,
            volumes: self.volumes,
            authors: names(&self.authors),
            run,
            members: self.members,
            favorites: self.favorites,
            genres: names(&self.genres),
            themes: names(&self.themes),
            record: self.into(),
        }
    }
}

impl From<CatalogEntry> for CatalogRecord {
    fn from(entry: CatalogEntry) -> Self {
        let image_url = entry.cover_url();
        CatalogRecord {
            id: entry.mal_id,
            title: entry.title,
            title_english: entry.title_english,
            kind: entry.kind,
            status: entry.status,
            rating: entry.rating,
            season: entry.season,
            year: entry.year,
            score: entry.score,
            popularity: entry.popularity,
            rank: entry.rank,
            image_url,
            url: entry.url,
        }
    }
}

impl From<MagazineItem> for Magazine {
    fn from(item: MagazineItem) -> Self {
        Magazine {
            id: item.mal_id,
            name: item.name,
            count: item.count,
            url: item.url,
        }
    }
}

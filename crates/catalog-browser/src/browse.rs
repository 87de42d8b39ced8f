//! Cached catalog pages: home showcase, detail page and magazine listing.
//!
//! Each page is a single pass-through fetch kept in the response cache for
//! the configured freshness window. Upstream failures are logged and turned
//! into the page's fallback (error, "not found" or an empty list).

use crate::api::JikanClient;
use crate::cache::ResponseCache;
use crate::source::SourceError;
use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use shared::{CatalogDetails, CatalogRecord, Magazine, MediaType};
use std::future::Future;
use tracing::{error, info, warn};

/// Top anime and top manga side by side
#[derive(Debug, Clone, PartialEq)]
pub struct Showcase {
    pub top_anime: Vec<CatalogRecord>,
    pub top_manga: Vec<CatalogRecord>,
}

/// Page-level access to the catalog
pub struct Browser {
    client: JikanClient,
    cache: ResponseCache,
    showcase_size: usize,
    magazine_limit: u32,
}

impl Browser {
    pub fn new(
        client: JikanClient,
        cache: ResponseCache,
        showcase_size: usize,
        magazine_limit: u32,
    ) -> Self {
        Self {
            client,
            cache,
            showcase_size,
            magazine_limit,
        }
    }

    pub fn client(&self) -> &JikanClient {
        &self.client
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Serve `key` from the cache or fetch and store it.
    ///
    /// The cache is best effort: unreadable or unwritable entries are logged
    /// and bypassed.
    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T, SourceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        match self.cache.get::<T>(key) {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => warn!(key = key, error = %e, "Ignoring unreadable cache entry"),
        }

        let fresh = fetch().await?;
        if let Err(e) = self.cache.set(key, &fresh) {
            warn!(key = key, error = %e, "Failed to cache response");
        }
        Ok(fresh)
    }

    async fn top_list(&self, media_type: MediaType) -> Result<Vec<CatalogRecord>, SourceError> {
        let mut records = self
            .cached(&format!("top_{}", media_type), move || async move {
                let response = self.client.top(media_type, 1).await?;
                Ok::<_, SourceError>(response
                    .data
                    .into_iter()
                    .map(CatalogRecord::from)
                    .collect::<Vec<_>>())
            })
            .await?;
        records.truncate(self.showcase_size);
        Ok(records)
    }

    /// Home page: top anime and top manga, fetched concurrently.
    ///
    /// Fails as a whole if either list cannot be fetched.
    pub async fn showcase(&self) -> Result<Showcase> {
        let (anime, manga) = tokio::join!(
            self.top_list(MediaType::Anime),
            self.top_list(MediaType::Manga)
        );

        match (anime, manga) {
            (Ok(top_anime), Ok(top_manga)) => {
                info!(
                    anime = top_anime.len(),
                    manga = top_manga.len(),
                    "Showcase loaded"
                );
                Ok(Showcase {
                    top_anime,
                    top_manga,
                })
            }
            (anime, manga) => {
                for e in [anime.err(), manga.err()].into_iter().flatten() {
                    error!(url = e.url(), error = %e, "Error fetching data");
                }
                Err(anyhow!("Failed to fetch all data"))
            }
        }
    }

    /// Detail page; `None` when the entry cannot be fetched
    pub async fn details(&self, media_type: MediaType, id: u32) -> Option<CatalogDetails> {
        let key = format!("{}_{}", media_type, id);
        match self.cache.get::<CatalogDetails>(&key) {
            Ok(Some(hit)) => return Some(hit),
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Ignoring unreadable cache entry"),
        }

        match self.client.details(media_type, id).await {
            Ok(Some(entry)) => {
                let details = entry.into_details(media_type);
                if let Err(e) = self.cache.set(&key, &details) {
                    warn!(key = %key, error = %e, "Failed to cache response");
                }
                Some(details)
            }
            Ok(None) => {
                warn!(media_type = %media_type, id = id, "No data in details response");
                None
            }
            Err(e) => {
                error!(media_type = %media_type, id = id, error = %e, "Error fetching details");
                None
            }
        }
    }

    /// Magazine listing; empty when the listing cannot be fetched
    pub async fn magazines(&self) -> Vec<Magazine> {
        let limit = self.magazine_limit;
        let result = self
            .cached(&format!("magazines_{}", limit), move || async move {
                let items = self.client.magazines(limit).await?;
                Ok::<_, SourceError>(items.into_iter().map(Magazine::from).collect::<Vec<_>>())
            })
            .await;

        match result {
            Ok(magazines) => magazines,
            Err(e) => {
                error!(error = %e, "Error fetching magazines");
                Vec::new()
            }
        }
    }
}

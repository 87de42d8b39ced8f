//! Jikan API client.
//!
//! Plain pass-through: one GET per call, no retries and no client-side rate
//! limiting. Failures surface as [`SourceError`].

use super::types::*;
use crate::source::{CatalogSource, SourceError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::config::CatalogConfig;
use shared::{CatalogRecord, MediaType};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Jikan API v4 client
#[derive(Debug, Clone)]
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `[catalog]` config section
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            &config.user_agent,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| SourceError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            // Jikan reports errors as JSON; fall back to the raw body otherwise
            let message = serde_json::from_str::<JikanError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            warn!(url = %url, status = %status, error = %message, "Request failed");
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<T>(&body) {
            Ok(data) => {
                debug!(url = %url, "Request successful");
                Ok(data)
            }
            Err(source) => {
                warn!(url = %url, error = %source, "Failed to parse response");
                Err(SourceError::Decode { url, source })
            }
        }
    }

    /// Search anime or manga by free text
    pub async fn search(
        &self,
        media_type: MediaType,
        query: &str,
        page: u32,
    ) -> Result<ListResponse<CatalogEntry>, SourceError> {
        info!(media_type = %media_type, query = query, page = page, "Searching catalog");
        self.get(&search_endpoint(media_type, query, page)).await
    }

    /// Fetch the top list for anime or manga
    pub async fn top(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> Result<ListResponse<CatalogEntry>, SourceError> {
        info!(media_type = %media_type, page = page, "Fetching top list");
        self.get(&format!("/top/{}?page={}", media_type, page)).await
    }

    /// Fetch one random entry
    pub async fn random(&self, media_type: MediaType) -> Result<CatalogEntry, SourceError> {
        info!(media_type = %media_type, "Fetching random entry");
        let url = format!("/random/{}", media_type);
        let response: ItemResponse<CatalogEntry> = self.get(&url).await?;
        response.data.ok_or_else(|| SourceError::MissingData {
            url: format!("{}{}", self.base_url, url),
        })
    }

    /// Fetch full details by MAL ID; `None` when the payload carries no data
    pub async fn details(
        &self,
        media_type: MediaType,
        mal_id: u32,
    ) -> Result<Option<CatalogEntry>, SourceError> {
        debug!(media_type = %media_type, mal_id = mal_id, "Fetching details");
        let response: ItemResponse<CatalogEntry> =
            self.get(&format!("/{}/{}", media_type, mal_id)).await?;
        Ok(response.data)
    }

    /// Fetch the magazine listing
    pub async fn magazines(&self, limit: u32) -> Result<Vec<MagazineItem>, SourceError> {
        info!(limit = limit, "Fetching magazines");
        let response: ListResponse<MagazineItem> =
            self.get(&format!("/magazines?limit={}", limit)).await?;
        Ok(response.data)
    }
}

/// Build the search endpoint path, percent-encoding the query
fn search_endpoint(media_type: MediaType, query: &str, page: u32) -> String {
    format!(
        "/{}?q={}&page={}",
        media_type,
        urlencoding::encode(query),
        page
    )
}

#[async_trait]
impl CatalogSource for JikanClient {
    async fn search_catalog(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<CatalogRecord>, SourceError> {
        let response = self.search(media_type, query, 1).await?;
        Ok(response.data.into_iter().map(CatalogRecord::from).collect())
    }
}

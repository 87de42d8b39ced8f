//! Random-pick explorer.
//!
//! Shows one random anime or manga at a time. Unlike search, a failed fetch
//! is surfaced to the user together with a retry action.

use crate::api::JikanClient;
use crate::source::SourceError;
use async_trait::async_trait;
use shared::{CatalogDetails, MediaType};
use tracing::{error, info};

/// Message shown when a random pick cannot be fetched
pub const FETCH_FAILED: &str = "Failed to fetch content. Please try again.";

/// Provider of random catalog entries
#[async_trait]
pub trait RandomSource: Send + Sync {
    async fn random_pick(&self, media_type: MediaType) -> Result<CatalogDetails, SourceError>;
}

#[async_trait]
impl RandomSource for JikanClient {
    async fn random_pick(&self, media_type: MediaType) -> Result<CatalogDetails, SourceError> {
        let entry = self.random(media_type).await?;
        Ok(entry.into_details(media_type))
    }
}

#[async_trait]
impl<S: RandomSource + ?Sized> RandomSource for &S {
    async fn random_pick(&self, media_type: MediaType) -> Result<CatalogDetails, SourceError> {
        (**self).random_pick(media_type).await
    }
}

/// Explorer state: current type, last pick and last error
pub struct Explorer<S> {
    source: S,
    media_type: MediaType,
    content: Option<CatalogDetails>,
    error: Option<String>,
}

impl<S: RandomSource> Explorer<S> {
    /// Create an explorer; nothing is fetched until `shuffle`
    pub fn new(source: S, media_type: MediaType) -> Self {
        Self {
            source,
            media_type,
            content: None,
            error: None,
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Current pick, hidden while an error is shown
    pub fn content(&self) -> Option<&CatalogDetails> {
        match self.error {
            Some(_) => None,
            None => self.content.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch a new random pick of the current type
    pub async fn shuffle(&mut self) -> Option<&CatalogDetails> {
        self.error = None;
        match self.source.random_pick(self.media_type).await {
            Ok(details) => {
                info!(
                    media_type = %self.media_type,
                    id = details.record.id,
                    title = %details.record.title,
                    "Random pick"
                );
                self.content = Some(details);
            }
            Err(e) => {
                error!(media_type = %self.media_type, error = %e, "Error fetching random content");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
        self.content()
    }

    /// Retry action offered after a failed fetch
    pub async fn retry(&mut self) -> Option<&CatalogDetails> {
        self.shuffle().await
    }

    /// Switch between anime and manga; a change triggers a fresh pick
    pub async fn set_media_type(&mut self, media_type: MediaType) -> Option<&CatalogDetails> {
        if media_type != self.media_type {
            self.media_type = media_type;
            self.content = None;
            return self.shuffle().await;
        }
        self.content()
    }
}

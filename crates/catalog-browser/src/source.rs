//! Remote catalog source abstraction.
//!
//! The search pipeline only needs "give me the records for this query". The
//! Jikan client is the production implementation; tests substitute their own.

use async_trait::async_trait;
use shared::{CatalogRecord, MediaType};
use thiserror::Error;

/// Failure while talking to the upstream catalog
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("Request to {url} failed with status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// The payload could not be decoded.
    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A success response carried no `data` payload.
    #[error("Response from {url} contained no data")]
    MissingData { url: String },
}

impl SourceError {
    /// URL of the request that failed
    pub fn url(&self) -> &str {
        match self {
            SourceError::Transport { url, .. }
            | SourceError::Status { url, .. }
            | SourceError::Decode { url, .. }
            | SourceError::MissingData { url } => url,
        }
    }
}

/// Provider of search results for a `(media type, query)` pair.
///
/// Latency is unbounded beyond the transport timeout and any call may fail.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search the catalog.
    ///
    /// # Errors
    /// - `SourceError::Transport` - network failure
    /// - `SourceError::Status` - non-success HTTP status
    /// - `SourceError::Decode` - unparseable payload
    /// - `SourceError::MissingData` - success response without a payload
    async fn search_catalog(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<CatalogRecord>, SourceError>;
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for &S {
    async fn search_catalog(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<CatalogRecord>, SourceError> {
        (**self).search_catalog(media_type, query).await
    }
}

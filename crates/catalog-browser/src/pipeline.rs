//! Search pipeline: source call, filter stage, sort stage.
//!
//! The pipeline never mutates displayed state itself. It returns a
//! [`SearchUpdate`] and the owner of the [`ResultSet`] applies it, so a failed
//! or skipped search leaves the previous results visible.

use crate::filter::{apply_filters, Filters};
use crate::sort::{sort_in_place, SortKey};
use crate::source::{CatalogSource, SourceError};
use shared::{CatalogRecord, MediaType};
use thiserror::Error;
use tracing::{debug, error, info};

/// Inputs of one search invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub media_type: MediaType,
    pub filters: Filters,
    pub sort: SortKey,
}

impl SearchRequest {
    /// Unfiltered request sorted by score
    pub fn new(query: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            query: query.into(),
            media_type,
            filters: Filters::default(),
            sort: SortKey::default(),
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Why a search produced no new result set
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Outcome of a search, to be applied to the displayed [`ResultSet`]
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// Replace the displayed results with these
    Replace(Vec<CatalogRecord>),
    /// Keep whatever is displayed
    Unchanged,
}

/// Filter then sort one batch of raw results
pub fn refine(
    records: &[CatalogRecord],
    media_type: MediaType,
    filters: &Filters,
    sort: SortKey,
) -> Vec<CatalogRecord> {
    let mut refined = apply_filters(records, media_type, filters);
    sort_in_place(&mut refined, sort);
    refined
}

/// Search pipeline over a catalog source
pub struct SearchPipeline<S> {
    source: S,
}

impl<S: CatalogSource> SearchPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the pipeline, reporting why nothing was produced.
    ///
    /// A whitespace-only query is rejected; any other query goes to the
    /// source as entered.
    pub async fn try_run(&self, request: &SearchRequest) -> Result<Vec<CatalogRecord>, SearchError> {
        let query = request.query.as_str();
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let raw = self.source.search_catalog(request.media_type, query).await?;
        let refined = refine(&raw, request.media_type, &request.filters, request.sort);

        info!(
            query = query,
            media_type = %request.media_type,
            received = raw.len(),
            kept = refined.len(),
            sort = %request.sort,
            "Search complete"
        );

        Ok(refined)
    }

    /// Run the pipeline; failures are logged and become `Unchanged`
    pub async fn run(&self, request: &SearchRequest) -> SearchUpdate {
        match self.try_run(request).await {
            Ok(records) => SearchUpdate::Replace(records),
            Err(SearchError::EmptyQuery) => {
                debug!("Ignoring search with empty query");
                SearchUpdate::Unchanged
            }
            Err(SearchError::Source(e)) => {
                error!(
                    query = %request.query,
                    media_type = %request.media_type,
                    error = %e,
                    "Search error"
                );
                SearchUpdate::Unchanged
            }
        }
    }
}

/// Result set currently on display
///
/// Every applied `Replace` overwrites the set wholesale; when searches
/// overlap, whichever completes last wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<CatalogRecord>,
}

impl ResultSet {
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply a search outcome; returns whether the displayed set changed
    pub fn apply(&mut self, update: SearchUpdate) -> bool {
        match update {
            SearchUpdate::Replace(records) => {
                self.records = records;
                true
            }
            SearchUpdate::Unchanged => false,
        }
    }

    /// Re-sort the displayed set from scratch by a newly selected key
    pub fn resort(&mut self, key: SortKey) {
        sort_in_place(&mut self.records, key);
    }
}

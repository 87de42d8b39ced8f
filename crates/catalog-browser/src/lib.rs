//! Catalog browser library for the Jikan anime/manga API.
//!
//! Provides the search pipeline (remote search, filter stage, sort stage)
//! plus the cached listing pages and the random-pick explorer used by the
//! `catalog-browser` CLI.

pub mod api;
pub mod browse;
pub mod cache;
pub mod collation;
pub mod explorer;
pub mod filter;
pub mod pipeline;
pub mod sort;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use api::JikanClient;
pub use browse::{Browser, Showcase};
pub use cache::ResponseCache;
pub use explorer::{Explorer, RandomSource};
pub use filter::{apply_filters, Filters, RatingFilter, SeasonFilter, StatusFilter};
pub use pipeline::{refine, ResultSet, SearchError, SearchPipeline, SearchRequest, SearchUpdate};
pub use sort::{sort_records, SortKey};
pub use source::{CatalogSource, SourceError};

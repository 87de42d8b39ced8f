//! Sort stage of the search pipeline.
//!
//! Exactly one key is active at a time. Sorting is stable, so records with
//! equal keys keep their upstream order.

use crate::collation;
use shared::CatalogRecord;
use std::fmt;
use std::str::FromStr;

use crate::filter::ParseSelectionError;

/// Rank substituted for unranked records so they sort last
pub const UNRANKED: u32 = 999_999;

/// Selectable ordering of a result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Highest score first, missing score counts as 0
    #[default]
    Score,
    /// Locale-aware alphabetical
    Title,
    /// Highest popularity figure first, missing counts as 0
    Popularity,
    /// Lowest rank first, missing sorts last
    Rank,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Score => "score",
            SortKey::Title => "title",
            SortKey::Popularity => "popularity",
            SortKey::Rank => "rank",
        })
    }
}

impl FromStr for SortKey {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "score" => Ok(SortKey::Score),
            "title" => Ok(SortKey::Title),
            "popularity" => Ok(SortKey::Popularity),
            "rank" => Ok(SortKey::Rank),
            _ => Err(ParseSelectionError {
                kind: "sort",
                value: s.to_string(),
            }),
        }
    }
}

fn score(record: &CatalogRecord) -> f64 {
    record.score.unwrap_or(0.0)
}

fn popularity(record: &CatalogRecord) -> u32 {
    record.popularity.unwrap_or(0)
}

fn rank(record: &CatalogRecord) -> u32 {
    record.rank.unwrap_or(UNRANKED)
}

/// Sort a slice in place by `key`
pub fn sort_in_place(records: &mut [CatalogRecord], key: SortKey) {
    match key {
        SortKey::Score => records.sort_by(|a, b| score(b).total_cmp(&score(a))),
        SortKey::Title => records.sort_by(|a, b| collation::compare(&a.title, &b.title)),
        SortKey::Popularity => records.sort_by_key(|r| std::cmp::Reverse(popularity(r))),
        SortKey::Rank => records.sort_by_key(rank),
    }
}

/// Return a new vector ordered by `key`
pub fn sort_records(records: &[CatalogRecord], key: SortKey) -> Vec<CatalogRecord> {
    let mut sorted = records.to_vec();
    sort_in_place(&mut sorted, key);
    sorted
}

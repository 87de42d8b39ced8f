//! Filter stage of the search pipeline.
//!
//! Narrows a result set by status, content rating and season. Each selection
//! is independent and `All` disables it. Matching policy per field:
//!
//! - status: case-insensitive substring, any of the selection's tokens
//! - rating: case-insensitive substring, anime only
//! - season: case-insensitive exact match, anime only
//!
//! A record missing the inspected field never matches an active selection.
//! Upstream labels are not a closed set, which is why status and rating use
//! substring tokens instead of enumerating every known label.

use shared::{CatalogRecord, MediaType};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown selection word on the command line
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {kind} filter: {value}")]
pub struct ParseSelectionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseSelectionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// True if `text`, lowercased, contains any of the (lowercase) tokens
fn contains_any(text: Option<&str>, tokens: &[&str]) -> bool {
    match text {
        Some(text) => {
            let text = text.to_lowercase();
            tokens.iter().any(|token| text.contains(token))
        }
        None => false,
    }
}

/// Lifecycle filter, shared by anime and manga
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Airing,
    Complete,
    Upcoming,
}

impl StatusFilter {
    /// Substrings of the lowercased upstream status that select this category.
    ///
    /// "finished airing" also contains "airing", so `Airing` matches on
    /// "currently airing" rather than the bare word.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            StatusFilter::All => &[],
            StatusFilter::Airing => &["currently airing", "publishing"],
            StatusFilter::Complete => &["finished", "complete"],
            StatusFilter::Upcoming => &["not yet", "upcoming"],
        }
    }

    pub fn matches(&self, status: Option<&str>) -> bool {
        match self {
            StatusFilter::All => true,
            _ => contains_any(status, self.tokens()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusFilter::All => "all",
            StatusFilter::Airing => "airing",
            StatusFilter::Complete => "complete",
            StatusFilter::Upcoming => "upcoming",
        })
    }
}

impl FromStr for StatusFilter {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "airing" => Ok(StatusFilter::Airing),
            "complete" => Ok(StatusFilter::Complete),
            "upcoming" => Ok(StatusFilter::Upcoming),
            _ => Err(ParseSelectionError::new("status", s)),
        }
    }
}

/// Content rating filter, anime only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RatingFilter {
    #[default]
    All,
    /// G - All Ages
    G,
    /// PG - Children
    Pg,
    /// PG-13 - Teens 13 or older
    Pg13,
    /// R - 17+ (violence & profanity)
    R17,
    /// R+ - Mild Nudity
    RPlus,
    /// Rx - Hentai
    Rx,
}

impl RatingFilter {
    /// Substring of the lowercased upstream rating label for this category
    pub fn token(&self) -> Option<&'static str> {
        match self {
            RatingFilter::All => None,
            RatingFilter::G => Some("g - all ages"),
            RatingFilter::Pg => Some("pg - children"),
            RatingFilter::Pg13 => Some("pg-13"),
            RatingFilter::R17 => Some("r - 17+"),
            RatingFilter::RPlus => Some("r+"),
            RatingFilter::Rx => Some("rx"),
        }
    }

    pub fn matches(&self, rating: Option<&str>) -> bool {
        match self.token() {
            None => true,
            Some(token) => contains_any(rating, &[token]),
        }
    }
}

impl fmt::Display for RatingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RatingFilter::All => "all",
            RatingFilter::G => "g",
            RatingFilter::Pg => "pg",
            RatingFilter::Pg13 => "pg13",
            RatingFilter::R17 => "r17",
            RatingFilter::RPlus => "r",
            RatingFilter::Rx => "rx",
        })
    }
}

impl FromStr for RatingFilter {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RatingFilter::All),
            "g" => Ok(RatingFilter::G),
            "pg" => Ok(RatingFilter::Pg),
            "pg13" => Ok(RatingFilter::Pg13),
            "r17" => Ok(RatingFilter::R17),
            "r" | "r+" => Ok(RatingFilter::RPlus),
            "rx" => Ok(RatingFilter::Rx),
            _ => Err(ParseSelectionError::new("rating", s)),
        }
    }
}

/// Broadcast season filter, anime only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SeasonFilter {
    #[default]
    All,
    Winter,
    Spring,
    Summer,
    Fall,
}

impl SeasonFilter {
    pub fn matches(&self, season: Option<&str>) -> bool {
        match (self, season) {
            (SeasonFilter::All, _) => true,
            (_, None) => false,
            (selected, Some(season)) => season.to_lowercase() == selected.to_string(),
        }
    }
}

impl fmt::Display for SeasonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeasonFilter::All => "all",
            SeasonFilter::Winter => "winter",
            SeasonFilter::Spring => "spring",
            SeasonFilter::Summer => "summer",
            SeasonFilter::Fall => "fall",
        })
    }
}

impl FromStr for SeasonFilter {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SeasonFilter::All),
            "winter" => Ok(SeasonFilter::Winter),
            "spring" => Ok(SeasonFilter::Spring),
            "summer" => Ok(SeasonFilter::Summer),
            "fall" => Ok(SeasonFilter::Fall),
            _ => Err(ParseSelectionError::new("season", s)),
        }
    }
}

/// The three filter selections of one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Filters {
    pub status: StatusFilter,
    pub rating: RatingFilter,
    pub season: SeasonFilter,
}

impl Filters {
    /// True when every selection is `All`
    pub fn is_inactive(&self) -> bool {
        *self == Filters::default()
    }

    /// Whether `record` passes every active selection.
    ///
    /// Rating and season only apply to anime searches.
    pub fn accepts(&self, record: &CatalogRecord, media_type: MediaType) -> bool {
        if !self.status.matches(record.status.as_deref()) {
            return false;
        }
        if media_type == MediaType::Anime {
            self.rating.matches(record.rating.as_deref())
                && self.season.matches(record.season.as_deref())
        } else {
            true
        }
    }
}

/// Keep the records accepted by `filters`, preserving order
pub fn apply_filters(
    records: &[CatalogRecord],
    media_type: MediaType,
    filters: &Filters,
) -> Vec<CatalogRecord> {
    records
        .iter()
        .filter(|record| filters.accepts(record, media_type))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{arb_records, record};
    use proptest::prelude::*;

    fn airing_records() -> Vec<CatalogRecord> {
        let mut first = record(1, "Frieren");
        first.status = Some("Currently Airing".to_string());
        first.rating = Some("R - 17+".to_string());

        let mut second = record(2, "Bebop");
        second.status = Some("Finished Airing".to_string());
        second.rating = Some("PG-13".to_string());

        vec![first, second]
    }

    #[test]
    fn test_status_airing_excludes_finished() {
        let filters = Filters {
            status: StatusFilter::Airing,
            ..Default::default()
        };
        let result = apply_filters(&airing_records(), MediaType::Anime, &filters);
        assert_eq!(result.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_rating_chained_over_status() {
        let status_only = Filters {
            status: StatusFilter::Airing,
            ..Default::default()
        };
        let airing = apply_filters(&airing_records(), MediaType::Anime, &status_only);

        let r17 = Filters {
            rating: RatingFilter::R17,
            ..status_only
        };
        assert_eq!(apply_filters(&airing, MediaType::Anime, &r17).len(), 1);

        let pg13 = Filters {
            rating: RatingFilter::Pg13,
            ..status_only
        };
        assert!(apply_filters(&airing, MediaType::Anime, &pg13).is_empty());
    }

    #[test]
    fn test_status_tokens_cover_manga_labels() {
        assert!(StatusFilter::Airing.matches(Some("Publishing")));
        assert!(StatusFilter::Complete.matches(Some("Finished")));
        assert!(StatusFilter::Complete.matches(Some("Finished Airing")));
        assert!(StatusFilter::Upcoming.matches(Some("Not yet aired")));
        assert!(StatusFilter::Upcoming.matches(Some("Not yet published")));
        assert!(!StatusFilter::Airing.matches(Some("On Hiatus")));
        assert!(!StatusFilter::Airing.matches(None));
        assert!(StatusFilter::All.matches(None));
    }

    #[test]
    fn test_rating_categories_do_not_overlap_on_full_labels() {
        let labels = [
            (RatingFilter::G, "G - All Ages"),
            (RatingFilter::Pg, "PG - Children"),
            (RatingFilter::Pg13, "PG-13 - Teens 13 or older"),
            (RatingFilter::R17, "R - 17+ (violence & profanity)"),
            (RatingFilter::RPlus, "R+ - Mild Nudity"),
            (RatingFilter::Rx, "Rx - Hentai"),
        ];
        for (filter, _) in &labels {
            let matched: Vec<_> = labels
                .iter()
                .filter(|(_, label)| filter.matches(Some(*label)))
                .map(|(f, _)| *f)
                .collect();
            assert_eq!(matched, vec![*filter], "filter {filter}");
        }
    }

    #[test]
    fn test_absent_rating_filtered_out() {
        let filters = Filters {
            rating: RatingFilter::G,
            ..Default::default()
        };
        let result = apply_filters(&[record(1, "No rating")], MediaType::Anime, &filters);
        assert!(result.is_empty());
    }

    #[test]
    fn test_season_exact_match() {
        assert!(SeasonFilter::Fall.matches(Some("fall")));
        assert!(SeasonFilter::Fall.matches(Some("Fall")));
        assert!(!SeasonFilter::Fall.matches(Some("fall 2023")));
        assert!(!SeasonFilter::Fall.matches(None));
    }

    #[test]
    fn test_rating_and_season_ignored_for_manga() {
        let mut manga = record(1, "Berserk");
        manga.status = Some("Publishing".to_string());
        let filters = Filters {
            status: StatusFilter::Airing,
            rating: RatingFilter::Rx,
            season: SeasonFilter::Winter,
        };

        assert_eq!(apply_filters(&[manga.clone()], MediaType::Manga, &filters).len(), 1);
        assert!(apply_filters(&[manga], MediaType::Anime, &filters).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let filters = Filters {
            status: StatusFilter::Complete,
            ..Default::default()
        };
        assert!(apply_filters(&[], MediaType::Anime, &filters).is_empty());
    }

    #[test]
    fn test_parse_selections() {
        assert_eq!("Airing".parse::<StatusFilter>(), Ok(StatusFilter::Airing));
        assert_eq!("r".parse::<RatingFilter>(), Ok(RatingFilter::RPlus));
        assert_eq!("pg13".parse::<RatingFilter>(), Ok(RatingFilter::Pg13));
        assert_eq!("fall".parse::<SeasonFilter>(), Ok(SeasonFilter::Fall));

        let err = "autumn".parse::<SeasonFilter>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid season filter: autumn");
    }

    #[test]
    fn test_display_parses_back() {
        for rating in [
            RatingFilter::All,
            RatingFilter::G,
            RatingFilter::Pg,
            RatingFilter::Pg13,
            RatingFilter::R17,
            RatingFilter::RPlus,
            RatingFilter::Rx,
        ] {
            assert_eq!(rating.to_string().parse::<RatingFilter>(), Ok(rating));
        }
    }

    fn arb_filters() -> impl Strategy<Value = Filters> {
        (
            prop_oneof![
                Just(StatusFilter::All),
                Just(StatusFilter::Airing),
                Just(StatusFilter::Complete),
                Just(StatusFilter::Upcoming),
            ],
            prop_oneof![
                Just(RatingFilter::All),
                Just(RatingFilter::Pg13),
                Just(RatingFilter::R17),
                Just(RatingFilter::RPlus),
            ],
            prop_oneof![
                Just(SeasonFilter::All),
                Just(SeasonFilter::Fall),
                Just(SeasonFilter::Spring),
            ],
        )
            .prop_map(|(status, rating, season)| Filters {
                status,
                rating,
                season,
            })
    }

    fn arb_media_type() -> impl Strategy<Value = MediaType> {
        prop_oneof![Just(MediaType::Anime), Just(MediaType::Manga)]
    }

    proptest! {
        #[test]
        fn prop_inactive_filters_are_identity(records in arb_records(), media_type in arb_media_type()) {
            let filters = Filters::default();
            prop_assert!(filters.is_inactive());
            prop_assert_eq!(apply_filters(&records, media_type, &filters), records);
        }

        #[test]
        fn prop_filter_is_idempotent(
            records in arb_records(),
            media_type in arb_media_type(),
            filters in arb_filters()
        ) {
            let once = apply_filters(&records, media_type, &filters);
            let twice = apply_filters(&once, media_type, &filters);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn prop_filter_keeps_relative_order(
            records in arb_records(),
            media_type in arb_media_type(),
            filters in arb_filters()
        ) {
            let ids: Vec<u32> = apply_filters(&records, media_type, &filters)
                .iter()
                .map(|r| r.id)
                .collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

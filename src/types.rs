//! Core types for seed books, normalized candidates, and recommendations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The reference work driving a recommendation run.
///
/// Built once per pipeline invocation from the first search response that
/// contains both a title and at least one author (falling back to the first
/// result regardless of completeness), then treated as immutable.
#[derive(Debug, Clone)]
pub struct SeedBook {
    /// Title of the seed work.
    pub title: String,
    /// Ordered author list; the first entry is the primary author.
    pub authors: Vec<String>,
    /// Category strings as reported by the provider.
    pub categories: Vec<String>,
    /// Free-text description (may be empty).
    pub description: String,
    /// Publication date string as reported (e.g. `"2006-07-25"` or `"2006"`).
    pub published_date: String,
    /// Keywords derived from categories and description.
    pub keywords: Vec<String>,
}

impl SeedBook {
    /// The primary author, if the seed has any authors at all.
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Publication year parsed from the first four characters of the
    /// date string. `None` when the date is missing or not numeric.
    pub fn published_year(&self) -> Option<i32> {
        parse_year(&self.published_date)
    }
}

/// A normalized book record from any provider, prior to scoring.
///
/// Invariant: `id` and `title` are non-empty — adapters discard records
/// lacking either before they enter the candidate pool. Identifiers are
/// provider identifiers used as-is, so uniqueness is source-local.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateBook {
    /// Stable identifier within one pipeline run.
    pub id: String,
    /// Title of the candidate work.
    pub title: String,
    /// Ordered author list.
    pub authors: Vec<String>,
    /// Category strings.
    pub categories: Vec<String>,
    /// Free-text description; empty when the source has none.
    pub description: String,
    /// Language tag (e.g. `"es"`).
    pub language: String,
    /// Average rating in [0, 5]; 0 when unknown.
    pub average_rating: f64,
    /// Number of ratings; 0 when unknown.
    pub ratings_count: u64,
    /// Publication date string as reported.
    pub published_date: String,
    /// Cover image URL, when the source provides one.
    pub cover_url: Option<String>,
    /// False when the source provides no description and no ratings.
    /// Used by the scoring engine's sparse-metadata compensation.
    pub has_rich_metadata: bool,
    /// Which provider produced this record.
    pub source: BookSource,
}

impl CandidateBook {
    /// Publication year parsed from the first four characters of the
    /// date string.
    pub fn published_year(&self) -> Option<i32> {
        parse_year(&self.published_date)
    }

    /// Publication decade (year rounded down to the nearest 10).
    pub fn decade(&self) -> Option<i32> {
        self.published_year().map(|y| (y / 10) * 10)
    }

    /// First author, used for display and diversity bucketing; a
    /// placeholder when the source reported none.
    pub fn display_author(&self) -> &str {
        self.authors.first().map_or("Unknown author", String::as_str)
    }
}

/// A candidate annotated with its relevance score.
///
/// The score is a derived, non-persisted annotation; it is dropped before
/// results leave the pipeline.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// The underlying candidate record.
    pub book: CandidateBook,
    /// Non-negative relevance score against the seed.
    pub score: f64,
}

/// Bibliographic search providers that book-scout can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookSource {
    /// Google Books volumes API — rich metadata (descriptions, ratings).
    GoogleBooks,
    /// Open Library search API — broad coverage, no descriptions or ratings.
    OpenLibrary,
}

impl BookSource {
    /// Returns the human-readable name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleBooks => "GoogleBooks",
            Self::OpenLibrary => "OpenLibrary",
        }
    }

    /// Returns all available source variants.
    pub fn all() -> &'static [BookSource] {
        &[Self::GoogleBooks, Self::OpenLibrary]
    }
}

impl fmt::Display for BookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single recommendation record as exposed to the entry-point layer.
///
/// Carries no internal scoring field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Title of the recommended work.
    pub title: String,
    /// Primary author, or a placeholder when the source reported none.
    pub author: String,
    /// Description truncated for display.
    pub description: String,
    /// Cover image URL, when available.
    pub cover_url: Option<String>,
    /// Average rating in [0, 5]; 0 when unknown.
    pub rating: f64,
    /// Number of ratings; 0 when unknown.
    pub ratings_count: u64,
    /// Publication date string.
    pub published_date: String,
    /// Category strings.
    pub categories: Vec<String>,
    /// Source identifier of the underlying record.
    pub id: String,
}

/// The pipeline's final ordered result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    /// Human-readable explanation of what the list was derived from.
    pub based_on: String,
    /// Number of recommendations in `items`.
    pub total: usize,
    /// Ordered recommendation records, best first.
    pub items: Vec<Recommendation>,
    /// Explanatory message when `items` is empty; `None` otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Parse a year from the first four characters of a date string.
fn parse_year(date: &str) -> Option<i32> {
    let prefix = date.get(..4)?;
    prefix.parse().ok()
}

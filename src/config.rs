//! Recommendation configuration with sensible defaults.
//!
//! [`RecommendConfig`] controls result limits, the target language, provider
//! endpoints, timeouts, cache TTLs, scoring weights, and diversity caps. The
//! defaults are tuned for a Spanish-language catalogue; every weight and cap
//! is independently tunable.

use crate::cache::DataClass;
use crate::error::RecommendError;

/// Configuration for one recommendation operation.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    /// Maximum number of recommendations in the final list.
    pub final_limit: usize,
    /// Target language tag; candidates in any other language are dropped.
    pub language: String,
    /// Language codes accepted from Open Library records (the provider
    /// reports both ISO 639-1 and 639-2 codes).
    pub accepted_language_aliases: Vec<String>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Google Books volumes endpoint. Overridable for tests.
    pub google_books_url: String,
    /// Open Library search endpoint. Overridable for tests.
    pub open_library_url: String,
    /// Open Library covers base URL. Overridable for tests.
    pub covers_url: String,
    /// Cache TTLs by data class. Set a class to 0 to disable caching for it.
    pub cache_ttl: CacheTtl,
    /// Scoring weights for the relevance engine.
    pub scoring: ScoringWeights,
    /// Per-attribute caps for the diversity selector.
    pub diversity: DiversityCaps,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            final_limit: 4,
            language: "es".into(),
            accepted_language_aliases: vec!["es".into(), "spa".into()],
            timeout_seconds: 10,
            google_books_url: "https://www.googleapis.com/books/v1/volumes".into(),
            open_library_url: "https://openlibrary.org/search.json".into(),
            covers_url: "https://covers.openlibrary.org".into(),
            cache_ttl: CacheTtl::default(),
            scoring: ScoringWeights::default(),
            diversity: DiversityCaps::default(),
        }
    }
}

impl RecommendConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `final_limit` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `language` must not be empty
    /// - every diversity cap must be greater than 0
    pub fn validate(&self) -> Result<(), RecommendError> {
        if self.final_limit == 0 {
            return Err(RecommendError::Config(
                "final_limit must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(RecommendError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.language.is_empty() {
            return Err(RecommendError::Config(
                "language must not be empty".into(),
            ));
        }
        if self.diversity.max_per_author == 0
            || self.diversity.max_per_decade == 0
            || self.diversity.max_per_series == 0
        {
            return Err(RecommendError::Config(
                "diversity caps must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Cache TTL table, keyed by [`DataClass`].
///
/// Search payloads turn over within the hour; rating data is stable for a
/// day; trending data goes stale in minutes.
#[derive(Debug, Clone)]
pub struct CacheTtl {
    /// TTL for search-result payloads, in seconds.
    pub search: u64,
    /// TTL for rating data, in seconds.
    pub ratings: u64,
    /// TTL for trending data, in seconds.
    pub trending: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            search: 3_600,
            ratings: 86_400,
            trending: 600,
        }
    }
}

impl CacheTtl {
    /// Resolve the TTL in seconds for a data class.
    pub fn for_class(&self, class: DataClass) -> u64 {
        match class {
            DataClass::Search => self.search,
            DataClass::Ratings => self.ratings,
            DataClass::Trending => self.trending,
        }
    }
}

/// Weights for the multi-criterion scoring engine.
///
/// Each component is capped by its weight; the final score is the component
/// sum and stays within [`ScoringWeights::theoretical_max`].
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Bonus when the seed's primary author appears in the candidate's
    /// author list.
    pub author_match: f64,
    /// Cap on the category-overlap component.
    pub category_max: f64,
    /// Increment per category substring match.
    pub category_per_match: f64,
    /// Cap on the description-similarity component.
    pub similarity_max: f64,
    /// Bonus when seed and candidate resolve to the same series.
    pub series_bonus: f64,
    /// Cap on the rating-quality component (`rating / 5 × cap`).
    pub rating_base_max: f64,
    /// Cap on the rating-volume step component.
    pub rating_count_max: f64,
    /// Bonus when seed and candidate publication years are within
    /// [`ScoringWeights::recency_near_years`].
    pub recency_near: f64,
    /// Smaller bonus within [`ScoringWeights::recency_far_years`].
    pub recency_far: f64,
    /// Year window for the full recency bonus.
    pub recency_near_years: i32,
    /// Year window for the reduced recency bonus.
    pub recency_far_years: i32,
    /// Compensation added to metadata-sparse candidates with a strong
    /// content match.
    pub sparse_compensation: f64,
    /// Content-match sum (author + category + series) above which the
    /// sparse compensation applies.
    pub sparse_content_threshold: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            author_match: 30.0,
            category_max: 25.0,
            category_per_match: 5.0,
            similarity_max: 15.0,
            series_bonus: 30.0,
            rating_base_max: 15.0,
            rating_count_max: 15.0,
            recency_near: 5.0,
            recency_far: 3.0,
            recency_near_years: 5,
            recency_far_years: 10,
            sparse_compensation: 25.0,
            sparse_content_threshold: 30.0,
        }
    }
}

impl ScoringWeights {
    /// Upper bound on any score this weight set can produce: the sum of all
    /// component maxima (with the most favourable popularity multiplier on
    /// the rating portion) plus the sparse-metadata compensation.
    pub fn theoretical_max(&self) -> f64 {
        self.author_match
            + (self.rating_base_max + self.rating_count_max) * 1.08
            + self.category_max
            + self.similarity_max
            + self.series_bonus
            + self.recency_near
            + self.sparse_compensation
    }
}

/// Occurrence caps for the diversity selector.
#[derive(Debug, Clone)]
pub struct DiversityCaps {
    /// Maximum results sharing a display author.
    pub max_per_author: usize,
    /// Maximum results sharing a publication decade.
    pub max_per_decade: usize,
    /// Maximum results from the same normalized series.
    pub max_per_series: usize,
}

impl Default for DiversityCaps {
    fn default() -> Self {
        Self {
            max_per_author: 2,
            max_per_decade: 3,
            max_per_series: 2,
        }
    }
}

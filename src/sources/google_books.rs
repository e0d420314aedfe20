//! Google Books volumes API — the metadata-rich primary source.
//!
//! Provides query builders for every acquisition strategy (author,
//! category, keyword pair, series, seed lookup, topic, fallbacks) and the
//! adapter that maps the volumes schema onto [`CandidateBook`].

use serde::Deserialize;

use crate::config::RecommendConfig;
use crate::sources::SourceAdapter;
use crate::types::{BookSource, CandidateBook};

/// Result-count hints per query strategy. The provider treats these as
/// upper bounds.
const SEED_RESULTS: u32 = 5;
const AUTHOR_RESULTS: u32 = 8;
const CATEGORY_RESULTS: u32 = 15;
const KEYWORD_RESULTS: u32 = 10;
const SERIES_RESULTS: u32 = 10;
const DECADE_RESULTS: u32 = 10;
const TOPIC_RESULTS: u32 = 30;

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

/// Top-level volumes search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumesResponse {
    /// Matched volumes; absent entirely when the search found nothing.
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// A single volume record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Volume {
    /// Provider identifier for this volume.
    #[serde(default)]
    pub id: String,
    /// Nested volume metadata.
    #[serde(default, rename = "volumeInfo")]
    pub volume_info: VolumeInfo,
}

/// Nested volume metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub average_rating: f64,
    pub ratings_count: u64,
    pub published_date: String,
    pub image_links: Option<ImageLinks>,
}

/// Cover image links for a volume.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageLinks {
    /// Thumbnail-sized cover URL.
    pub thumbnail: Option<String>,
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

fn params(pairs: &[(&str, String)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Seed lookup. The exact variant quotes the whole query as a phrase;
/// recommendation quality depends on resolving the right seed, so the
/// caller tries exact first and relaxes on an empty response.
pub fn seed_query(query: &str, exact: bool) -> Vec<(String, String)> {
    let q = if exact {
        format!("\"{query}\"")
    } else {
        query.to_string()
    };
    params(&[("q", q), ("maxResults", SEED_RESULTS.to_string())])
}

/// Works by a given author.
pub fn author_query(author: &str) -> Vec<(String, String)> {
    params(&[
        ("q", format!("inauthor:\"{author}\"")),
        ("maxResults", AUTHOR_RESULTS.to_string()),
    ])
}

/// Relevance-ordered works in a category. Also serves as the bestseller
/// fallback query.
pub fn category_query(category_leaf: &str) -> Vec<(String, String)> {
    params(&[
        ("q", format!("subject:\"{category_leaf}\"")),
        ("maxResults", CATEGORY_RESULTS.to_string()),
        ("orderBy", "relevance".to_string()),
    ])
}

/// Free-text search over a keyword pair.
pub fn keyword_query(keywords: &[String]) -> Vec<(String, String)> {
    params(&[
        ("q", keywords.join(" ")),
        ("maxResults", KEYWORD_RESULTS.to_string()),
        ("orderBy", "relevance".to_string()),
    ])
}

/// Other installments of a series by the same author.
pub fn series_query(series_name: &str, author: &str) -> Vec<(String, String)> {
    params(&[
        ("q", format!("intitle:\"{series_name}\" inauthor:\"{author}\"")),
        ("maxResults", SERIES_RESULTS.to_string()),
    ])
}

/// Fallback: works by the author around a publication decade.
pub fn decade_query(author: &str, decade: i32) -> Vec<(String, String)> {
    params(&[
        ("q", format!("{author} {decade}")),
        ("maxResults", DECADE_RESULTS.to_string()),
    ])
}

/// Topic mode: one broad relevance-ordered search.
pub fn topic_query(query: &str) -> Vec<(String, String)> {
    params(&[
        ("q", query.to_string()),
        ("maxResults", TOPIC_RESULTS.to_string()),
        ("orderBy", "relevance".to_string()),
    ])
}

/// Reduce a slash-delimited provider category to its most specific
/// segment: `"Fiction / Fantasy / Epic"` → `"Epic"`.
pub fn category_leaf(category: &str) -> &str {
    category.rsplit('/').next().map_or(category, str::trim)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Google Books volumes adapter.
pub struct GoogleBooksAdapter;

impl SourceAdapter for GoogleBooksAdapter {
    fn source(&self) -> BookSource {
        BookSource::GoogleBooks
    }

    fn normalize(&self, payload: &serde_json::Value, _config: &RecommendConfig) -> Vec<CandidateBook> {
        let response: VolumesResponse = match serde_json::from_value(payload.clone()) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Google Books payload did not match the volumes schema");
                return Vec::new();
            }
        };
        let candidates: Vec<CandidateBook> = response
            .items
            .into_iter()
            .filter_map(normalize_volume)
            .collect();
        tracing::debug!(count = candidates.len(), "Google Books candidates normalized");
        candidates
    }
}

/// Map one volume onto the canonical candidate shape.
///
/// Returns `None` when the record lacks a title or identifier.
pub(crate) fn normalize_volume(volume: Volume) -> Option<CandidateBook> {
    if volume.id.is_empty() {
        return None;
    }
    let info = volume.volume_info;
    let title = info.title.filter(|t| !t.is_empty())?;

    let description = info.description.unwrap_or_default();
    let has_rich_metadata = !description.is_empty() || info.ratings_count > 0;

    Some(CandidateBook {
        id: volume.id,
        title,
        authors: info.authors,
        categories: info.categories,
        description,
        language: info.language.unwrap_or_default(),
        average_rating: info.average_rating,
        ratings_count: info.ratings_count,
        published_date: info.published_date,
        cover_url: info.image_links.and_then(|links| links.thumbnail),
        has_rich_metadata,
        source: BookSource::GoogleBooks,
    })
}

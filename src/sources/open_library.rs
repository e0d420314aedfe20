//! Open Library search API — the broad-coverage secondary source.
//!
//! Open Library speaks a flat document schema with no descriptions or
//! ratings, so its adapter synthesizes the canonical candidate shape:
//! subjects become categories, the first-publish year becomes the
//! publication date, the cover identifier becomes a covers URL, and
//! `has_rich_metadata` is always false so the scoring engine can
//! compensate strong content matches.

use serde::Deserialize;

use crate::config::RecommendConfig;
use crate::sources::SourceAdapter;
use crate::types::{BookSource, CandidateBook};

/// Result-count hint. Higher than the primary source's hints because far
/// fewer records survive the language gate.
const SEARCH_RESULTS: u32 = 25;

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

/// Top-level search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matched documents.
    #[serde(default)]
    pub docs: Vec<Doc>,
}

/// A single search document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Doc {
    /// Provider identifier, e.g. `"/works/OL82563W"`.
    pub key: String,
    pub title: Option<String>,
    pub author_name: Vec<String>,
    pub subject: Vec<String>,
    pub first_publish_year: Option<i64>,
    /// Cover image identifier for the covers service.
    pub cover_i: Option<i64>,
    /// Language codes; the provider mixes ISO 639-1 and 639-2.
    pub language: Vec<String>,
}

// ---------------------------------------------------------------------------
// Query builder
// ---------------------------------------------------------------------------

/// Search restricted to the target language, preferring the author over
/// keywords when both are available.
///
/// Returns `None` when there is neither an author nor any keyword to
/// search with.
pub fn search_query(
    author: Option<&str>,
    keywords: &[String],
    config: &RecommendConfig,
) -> Option<Vec<(String, String)>> {
    let q = match author {
        Some(author) if !author.is_empty() => format!("author:\"{author}\""),
        _ if !keywords.is_empty() => keywords.join(" "),
        _ => return None,
    };
    let language = config
        .accepted_language_aliases
        .iter()
        .max_by_key(|alias| alias.len())
        .cloned()
        .unwrap_or_else(|| config.language.clone());
    Some(vec![
        ("q".into(), q),
        ("limit".into(), SEARCH_RESULTS.to_string()),
        ("language".into(), language),
    ])
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Open Library search adapter.
pub struct OpenLibraryAdapter;

impl SourceAdapter for OpenLibraryAdapter {
    fn source(&self) -> BookSource {
        BookSource::OpenLibrary
    }

    fn normalize(&self, payload: &serde_json::Value, config: &RecommendConfig) -> Vec<CandidateBook> {
        let response: SearchResponse = match serde_json::from_value(payload.clone()) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Open Library payload did not match the search schema");
                return Vec::new();
            }
        };
        let candidates: Vec<CandidateBook> = response
            .docs
            .into_iter()
            .filter_map(|doc| normalize_doc(doc, config))
            .collect();
        tracing::debug!(count = candidates.len(), "Open Library candidates normalized");
        candidates
    }
}

/// Map one document onto the canonical candidate shape.
///
/// Documents whose language list contains none of the accepted aliases
/// are dropped here, before they enter the shared pool; the provider-side
/// filter alone has proven unreliable.
fn normalize_doc(doc: Doc, config: &RecommendConfig) -> Option<CandidateBook> {
    let accepted = &config.accepted_language_aliases;
    if !doc.language.iter().any(|lang| accepted.contains(lang)) {
        return None;
    }
    if doc.key.is_empty() {
        return None;
    }
    let title = doc.title.filter(|t| !t.is_empty())?;

    let cover_url = doc
        .cover_i
        .map(|id| format!("{}/b/id/{}-M.jpg", config.covers_url, id));
    let published_date = doc
        .first_publish_year
        .map(|year| year.to_string())
        .unwrap_or_default();

    Some(CandidateBook {
        id: doc.key,
        title,
        authors: doc.author_name,
        categories: doc.subject,
        description: String::new(),
        language: config.language.clone(),
        average_rating: 0.0,
        ratings_count: 0,
        published_date,
        cover_url,
        has_rich_metadata: false,
        source: BookSource::OpenLibrary,
    })
}

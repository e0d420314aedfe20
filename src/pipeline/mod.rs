//! Recommendation pipeline: seed resolution, concurrent acquisition,
//! filtering, scoring, stable ranking, and diversity selection.
//!
//! Data flows strictly forward — seed book → keyword extraction →
//! concurrent acquisition → normalization → scoring → sort → diversity
//! filter → final list. Candidates are passed as immutable value records
//! between stages and nothing survives one invocation.

pub mod acquire;
pub mod diversity;
pub mod filter;
pub mod scoring;

use std::cmp::Ordering;
use std::sync::Arc;

use crate::cache::DataClass;
use crate::config::RecommendConfig;
use crate::error::{RecommendError, Result};
use crate::http;
use crate::sources::google_books::{self, Volume, VolumesResponse};
use crate::sources::{GoogleBooksAdapter, SourceAdapter};
use crate::text;
use crate::types::{CandidateBook, Recommendation, Recommendations, ScoredCandidate, SeedBook};
use self::scoring::{EmbeddingProvider, ScoringEngine};

/// Display truncation length for recommendation descriptions.
const DESCRIPTION_DISPLAY_CHARS: usize = 150;

/// Marker appended when a description is truncated.
const ELLIPSIS: &str = "...";

/// Message carried by a successful-but-empty result.
const NO_RESULTS_MESSAGE: &str = "No relevant recommendations found.";

/// Run the full pipeline for one seed query.
///
/// # Pipeline
///
/// 1. Resolve the seed book (quoted-phrase lookup, relaxed retry)
/// 2. Acquire candidates — concurrent fan-out for title-seeded runs
///    (plus fallback enrichment when the pool is short), a single broad
///    query for topic runs
/// 3. Filter the pool (dedup, language, seed echoes)
/// 4. Score each survivor against the seed
/// 5. Stable sort by score descending
/// 6. Greedy diversity selection down to the final limit
///
/// # Errors
///
/// Returns [`RecommendError::SeedNotFound`] when no seed can be resolved.
/// An empty candidate pool is not an error: the result carries an
/// explanatory message instead.
pub async fn run(
    query: &str,
    config: &RecommendConfig,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
) -> Result<Recommendations> {
    let client = http::build_client(config)?;

    // 1. Resolve the seed book.
    let response = lookup_seed(&client, query, config)
        .await
        .ok_or_else(|| RecommendError::SeedNotFound(query.to_string()))?;
    let seed = select_seed(response)
        .ok_or_else(|| RecommendError::SeedNotFound(query.to_string()))?;
    let title_seeded = !seed.authors.is_empty();
    tracing::debug!(seed = %seed.title, title_seeded, "seed resolved");

    // 2. Acquire the candidate pool.
    let based_on;
    let mut pool;
    if let Some(author) = seed.primary_author() {
        based_on = format!("Because you read \"{}\" by {}", seed.title, author);
        pool = acquire::gather_candidates(&client, &seed, config).await;
        if pool.len() < config.final_limit {
            let extra = acquire::fallback_candidates(&client, &seed, config).await;
            pool.extend(extra);
        }
    } else {
        based_on = format!("Results for: {query}");
        let params = google_books::topic_query(query);
        let payload = acquire::fetch_payload(
            &client,
            &config.google_books_url,
            &params,
            DataClass::Search,
            config,
        )
        .await;
        pool = match payload {
            Some(payload) => GoogleBooksAdapter.normalize(&payload, config),
            None => Vec::new(),
        };
    }
    tracing::debug!(pool = pool.len(), "candidate pool acquired");

    // 3. Filter, score, sort.
    let candidates = filter::filter_candidates(pool, &seed, query, title_seeded, config);
    let engine = match embeddings {
        Some(provider) => ScoringEngine::with_embeddings(config.scoring.clone(), provider),
        None => ScoringEngine::new(config.scoring.clone()),
    };
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|book| {
            let score = engine.score(&book, &seed);
            ScoredCandidate { book, score }
        })
        .collect();
    // Stable sort: candidates with equal scores keep acquisition order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    // 4. Diversify and build the public records.
    let selected = diversity::select_diverse(scored, &config.diversity, config.final_limit);
    let items: Vec<Recommendation> = selected
        .into_iter()
        .map(|scored| build_recommendation(scored.book))
        .collect();
    let message = items.is_empty().then(|| NO_RESULTS_MESSAGE.to_string());
    tracing::debug!(selected = items.len(), "recommendations ready");

    Ok(Recommendations {
        based_on,
        total: items.len(),
        items,
        message,
    })
}

/// Resolve the seed search payload: exact-phrase first, relaxed retry on
/// an empty response. `None` when both attempts yield nothing usable.
async fn lookup_seed(
    client: &reqwest::Client,
    query: &str,
    config: &RecommendConfig,
) -> Option<VolumesResponse> {
    for exact in [true, false] {
        let params = google_books::seed_query(query, exact);
        let Some(payload) = acquire::fetch_payload(
            client,
            &config.google_books_url,
            &params,
            DataClass::Search,
            config,
        )
        .await
        else {
            continue;
        };
        match serde_json::from_value::<VolumesResponse>(payload) {
            Ok(response) if !response.items.is_empty() => return Some(response),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "seed payload did not match the volumes schema");
            }
        }
    }
    None
}

/// Pick the seed volume: the first result carrying both a title and at
/// least one author, else the first result regardless of completeness.
fn select_seed(response: VolumesResponse) -> Option<SeedBook> {
    let items = response.items;
    let complete = items
        .iter()
        .position(|v| v.volume_info.title.is_some() && !v.volume_info.authors.is_empty());
    let index = complete.unwrap_or(0);
    items.into_iter().nth(index).map(seed_from_volume)
}

fn seed_from_volume(volume: Volume) -> SeedBook {
    let info = volume.volume_info;
    let description = info.description.unwrap_or_default();
    let keywords = text::extract_keywords(&info.categories, &description);
    SeedBook {
        title: info.title.unwrap_or_default(),
        authors: info.authors,
        categories: info.categories,
        description,
        published_date: info.published_date,
        keywords,
    }
}

/// Strip the internal score and truncate the description for display.
fn build_recommendation(book: CandidateBook) -> Recommendation {
    let author = book.display_author().to_string();
    let description = truncate_description(&book.description);
    Recommendation {
        title: book.title,
        author,
        description,
        cover_url: book.cover_url,
        rating: book.average_rating,
        ratings_count: book.ratings_count,
        published_date: book.published_date,
        categories: book.categories,
        id: book.id,
    }
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_DISPLAY_CHARS {
        return description.to_string();
    }
    let prefix: String = description
        .chars()
        .take(DESCRIPTION_DISPLAY_CHARS - ELLIPSIS.len())
        .collect();
    format!("{prefix}{ELLIPSIS}")
}

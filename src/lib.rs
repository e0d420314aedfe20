//! # book-scout
//!
//! Multi-source book recommendation engine.
//!
//! Given a single seed query — a book title or a topic — this crate
//! resolves a seed book, fans out a bounded batch of queries across two
//! bibliographic providers (Google Books and Open Library) concurrently,
//! normalizes everything into one candidate schema, scores each candidate
//! against the seed on multiple criteria, and greedily selects a
//! diversity-constrained top-K result list.
//!
//! ## Design
//!
//! - Concurrent provider fan-out with per-query failure isolation —
//!   a slow or failing query contributes nothing instead of failing the run
//! - Cache-aside payload caching with per-data-class TTLs
//! - Source-agnostic scoring: both providers normalize into one
//!   [`CandidateBook`] shape behind a small adapter trait
//! - Pluggable semantic-embedding capability with a keyword-similarity
//!   fallback, so constrained deployments score identically in shape
//! - Greedy per-author / per-decade / per-series diversity caps
//!
//! ## Security
//!
//! - No API keys or secrets to leak — both providers are public JSON APIs
//! - No network listeners in the library; the HTTP server is a separate
//!   thin binary

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod series;
pub mod sources;
pub mod text;
pub mod types;

use std::sync::Arc;

pub use config::RecommendConfig;
pub use error::{RecommendError, Result};
pub use pipeline::scoring::EmbeddingProvider;
pub use types::{BookSource, CandidateBook, Recommendation, Recommendations, SeedBook};

/// Produce recommendations for a seed query.
///
/// Resolves the seed, acquires candidates from all providers
/// concurrently, scores, ranks, and diversifies. Individual provider
/// failures are logged and tolerated; an empty candidate pool yields a
/// successful empty result with an explanatory message.
///
/// # Errors
///
/// Returns [`RecommendError::Config`] for an invalid configuration and
/// [`RecommendError::SeedNotFound`] when no seed book can be resolved
/// for the query. Empty input is a boundary concern — callers validate
/// it before invoking the pipeline.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> book_scout::Result<()> {
/// let config = book_scout::RecommendConfig::default();
/// let recs = book_scout::recommend("Mistborn: The Final Empire", &config).await?;
/// println!("{}", recs.based_on);
/// for rec in &recs.items {
///     println!("{} — {}", rec.title, rec.author);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn recommend(query: &str, config: &RecommendConfig) -> Result<Recommendations> {
    config.validate()?;
    pipeline::run(query, config, None).await
}

/// Produce recommendations with a semantic-embedding capability.
///
/// Identical to [`recommend`] except that description similarity is
/// computed with cosine similarity over `embeddings` instead of the
/// keyword-Jaccard fallback, whenever the provider can embed both texts.
///
/// # Errors
///
/// Same as [`recommend`].
pub async fn recommend_with_embeddings(
    query: &str,
    config: &RecommendConfig,
    embeddings: Arc<dyn EmbeddingProvider>,
) -> Result<Recommendations> {
    config.validate()?;
    pipeline::run(query, config, Some(embeddings)).await
}

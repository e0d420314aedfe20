//! Multi-criterion relevance scoring against the seed book.
//!
//! Each candidate is scored as a sum of independent components: author
//! match, rating quality and volume (with a popularity adjustment),
//! category overlap, description similarity, series bonus, recency, and
//! a compensation term for metadata-sparse sources. Weights come from
//! [`ScoringWeights`] and are independently tunable.
//!
//! The engine is deterministic and pure: identical (candidate, seed)
//! pairs always yield identical scores, and every score is non-negative
//! and bounded by [`ScoringWeights::theoretical_max`].

use std::sync::Arc;

use crate::config::ScoringWeights;
use crate::series::detect_series;
use crate::text;
use crate::types::{CandidateBook, SeedBook};

/// Ratings-count thresholds for the volume step function.
const COUNT_HIGH: u64 = 5_000;
const COUNT_MEDIUM: u64 = 1_000;
const COUNT_LOW: u64 = 100;

/// Ratings-count bands for the popularity adjustment.
const MEGA_BESTSELLER_COUNT: u64 = 50_000;
const VERY_POPULAR_COUNT: u64 = 10_000;
const NICHE_COUNT: u64 = 50;
const MICRO_NICHE_COUNT: u64 = 10;

/// Mega-bestsellers get a slight penalty; small-but-reviewed books get a
/// boost so the list is not wall-to-wall household names.
const MEGA_BESTSELLER_FACTOR: f64 = 0.92;
const NICHE_FACTOR: f64 = 1.08;
const MICRO_NICHE_FACTOR: f64 = 1.05;

/// Characters of each description fed into the similarity comparison.
const SIMILARITY_PREFIX_CHARS: usize = 500;

/// An optional semantic-embedding capability.
///
/// Richer deployments provide one; constrained deployments run without.
/// The engine queries it at call time and falls back to keyword Jaccard
/// similarity whenever it is absent or declines a text, so the scoring
/// contract's shape and range never change.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text into a dense vector, or `None` when this capability
    /// cannot embed it.
    fn embed(&self, text: &str) -> Option<Vec<f32>>;
}

/// The scoring engine for one pipeline invocation.
pub struct ScoringEngine {
    weights: ScoringWeights,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
}

impl ScoringEngine {
    /// Build an engine with no embedding capability (Jaccard fallback).
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            embeddings: None,
        }
    }

    /// Build an engine backed by a semantic-embedding capability.
    pub fn with_embeddings(weights: ScoringWeights, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            weights,
            embeddings: Some(embeddings),
        }
    }

    /// Score a candidate against the seed. Non-negative, deterministic,
    /// side-effect free.
    pub fn score(&self, candidate: &CandidateBook, seed: &SeedBook) -> f64 {
        let w = &self.weights;

        let author_score = match seed.primary_author() {
            Some(author) if candidate.authors.iter().any(|a| a == author) => w.author_match,
            _ => 0.0,
        };

        let rating_base = if candidate.average_rating > 0.0 {
            (candidate.average_rating / 5.0) * w.rating_base_max
        } else {
            0.0
        };
        let rating_volume = rating_volume_score(candidate.ratings_count, w.rating_count_max);
        let rating_score = adjust_for_popularity(rating_base + rating_volume, candidate.ratings_count);

        let category_score = category_overlap_score(&seed.categories, &candidate.categories, w);
        let similarity_score = self.similarity_score(&seed.description, &candidate.description);
        let series_score = series_bonus(&seed.title, &candidate.title, w.series_bonus);
        let recency_score = recency_bonus(seed, candidate, w);

        let mut total =
            author_score + rating_score + category_score + similarity_score + series_score + recency_score;

        // Rating/description-less sources cannot earn the metadata-driven
        // components; a strong content match earns compensation so they
        // can still compete.
        if !candidate.has_rich_metadata {
            let content_match = author_score + category_score + series_score;
            if content_match > w.sparse_content_threshold {
                total += w.sparse_compensation;
            }
        }

        total
    }

    /// Topical similarity over description prefixes: cosine over the
    /// embedding capability when available, Jaccard of word sets
    /// otherwise. Zero when either description is empty.
    fn similarity_score(&self, seed_description: &str, candidate_description: &str) -> f64 {
        if seed_description.is_empty() || candidate_description.is_empty() {
            return 0.0;
        }
        let a: String = seed_description.chars().take(SIMILARITY_PREFIX_CHARS).collect();
        let b: String = candidate_description.chars().take(SIMILARITY_PREFIX_CHARS).collect();

        if let Some(embeddings) = &self.embeddings {
            if let (Some(va), Some(vb)) = (embeddings.embed(&a), embeddings.embed(&b)) {
                return cosine_similarity(&va, &vb).max(0.0) * self.weights.similarity_max;
            }
        }
        text::jaccard(&a, &b) * self.weights.similarity_max
    }
}

/// Step function over the ratings count: full weight above the high
/// threshold, two-thirds above the medium, one-third above the low.
fn rating_volume_score(ratings_count: u64, max_weight: f64) -> f64 {
    if ratings_count > COUNT_HIGH {
        max_weight
    } else if ratings_count > COUNT_MEDIUM {
        max_weight * (2.0 / 3.0)
    } else if ratings_count > COUNT_LOW {
        max_weight * (1.0 / 3.0)
    } else {
        0.0
    }
}

/// Popularity adjustment applied to the combined rating score.
///
/// Bands, highest first: mega-bestsellers are damped, very popular books
/// pass unchanged, niche books with some signal are boosted, barely-rated
/// books get a smaller boost, and everything else (including zero
/// ratings) passes unchanged.
pub(crate) fn adjust_for_popularity(rating_score: f64, ratings_count: u64) -> f64 {
    if ratings_count > MEGA_BESTSELLER_COUNT {
        rating_score * MEGA_BESTSELLER_FACTOR
    } else if ratings_count > VERY_POPULAR_COUNT {
        rating_score
    } else if (MICRO_NICHE_COUNT..NICHE_COUNT).contains(&ratings_count) {
        rating_score * NICHE_FACTOR
    } else if (1..MICRO_NICHE_COUNT).contains(&ratings_count) {
        rating_score * MICRO_NICHE_FACTOR
    } else {
        rating_score
    }
}

/// Count substring-level category matches (case-insensitive, either
/// direction), each worth a fixed increment, capped at the component
/// maximum.
fn category_overlap_score(
    seed_categories: &[String],
    candidate_categories: &[String],
    weights: &ScoringWeights,
) -> f64 {
    if seed_categories.is_empty() || candidate_categories.is_empty() {
        return 0.0;
    }
    let mut matches = 0u32;
    for seed_category in seed_categories {
        let seed_lower = seed_category.to_lowercase();
        for candidate_category in candidate_categories {
            let candidate_lower = candidate_category.to_lowercase();
            if candidate_lower.contains(&seed_lower) || seed_lower.contains(&candidate_lower) {
                matches += 1;
            }
        }
    }
    (f64::from(matches) * weights.category_per_match).min(weights.category_max)
}

/// Fixed bonus when both titles resolve to the same normalized series.
fn series_bonus(seed_title: &str, candidate_title: &str, bonus: f64) -> f64 {
    let (Some(seed_series), Some(candidate_series)) =
        (detect_series(seed_title), detect_series(candidate_title))
    else {
        return 0.0;
    };
    if text::normalize(&seed_series.name) == text::normalize(&candidate_series.name) {
        bonus
    } else {
        0.0
    }
}

/// Small bonus for publication proximity; unparseable years on either
/// side skip the component.
fn recency_bonus(seed: &SeedBook, candidate: &CandidateBook, weights: &ScoringWeights) -> f64 {
    let (Some(seed_year), Some(candidate_year)) = (seed.published_year(), candidate.published_year())
    else {
        return 0.0;
    };
    let gap = (seed_year - candidate_year).abs();
    if gap <= weights.recency_near_years {
        weights.recency_near
    } else if gap <= weights.recency_far_years {
        weights.recency_far
    } else {
        0.0
    }
}

/// Cosine similarity of two dense vectors; zero for mismatched or
/// zero-magnitude inputs.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|y| f64::from(*y) * f64::from(*y)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

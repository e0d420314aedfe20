//! Candidate pool filtering ahead of scoring.
//!
//! The acquisition stage concatenates provider results without any
//! dedup; this stage enforces the pool invariants: complete records
//! only, one entry per identifier, target language only, and no echoes
//! of the seed itself.

use std::collections::HashSet;

use crate::config::RecommendConfig;
use crate::text;
use crate::types::{CandidateBook, SeedBook};

/// A title-seeded query shorter than this is too generic for the
/// query-echo exclusion to be safe.
const MIN_QUERY_ECHO_LEN: usize = 5;

/// Filter the raw candidate pool.
///
/// Keeps a candidate only if it:
/// - has a non-empty title and identifier,
/// - has not been seen before in this run (identifier dedup, first
///   occurrence wins),
/// - is in the target language,
/// - is not the seed itself (normalized-title comparison), and
/// - for title-seeded runs, does not merely echo the query: when the
///   normalized query exceeds [`MIN_QUERY_ECHO_LEN`] characters it must
///   not be a substring of the normalized candidate title. This keeps
///   near-duplicate sequels and re-editions of the searched title from
///   dominating the list.
///
/// First-seen order is preserved.
pub fn filter_candidates(
    pool: Vec<CandidateBook>,
    seed: &SeedBook,
    query: &str,
    title_seeded: bool,
    config: &RecommendConfig,
) -> Vec<CandidateBook> {
    let seed_title = text::normalize(&seed.title);
    let query_norm = text::normalize(query);
    let mut seen: HashSet<String> = HashSet::new();

    pool.into_iter()
        .filter(|candidate| {
            if candidate.title.is_empty() || candidate.id.is_empty() {
                return false;
            }
            if candidate.language != config.language {
                return false;
            }
            if !seen.insert(candidate.id.clone()) {
                return false;
            }
            let title = text::normalize(&candidate.title);
            if title == seed_title {
                return false;
            }
            if title_seeded && query_norm.len() > MIN_QUERY_ECHO_LEN && title.contains(&query_norm)
            {
                return false;
            }
            true
        })
        .collect()
}

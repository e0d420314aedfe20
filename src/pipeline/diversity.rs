//! Greedy diversity-constrained selection of the final result set.
//!
//! Scans the score-sorted candidate list once, keeping per-author,
//! per-decade, and per-series occurrence counters, and accepts a
//! candidate only while all three counters are under their caps. No
//! backtracking and no global optimum search — local greedy acceptance
//! over a stable ordering is the intended policy.

use std::collections::HashMap;

use crate::config::DiversityCaps;
use crate::series::detect_series;
use crate::text;
use crate::types::ScoredCandidate;

/// Select up to `limit` candidates from a list sorted descending by
/// score, honouring the per-attribute caps.
///
/// The decade check is skipped for candidates without a parseable
/// publication year, and the series check for titles that resolve to no
/// series. Input order is preserved in the output.
pub fn select_diverse(
    candidates: Vec<ScoredCandidate>,
    caps: &DiversityCaps,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let mut author_counts: HashMap<String, usize> = HashMap::new();
    let mut decade_counts: HashMap<i32, usize> = HashMap::new();
    let mut series_counts: HashMap<String, usize> = HashMap::new();
    let mut selected = Vec::new();

    for candidate in candidates {
        if selected.len() >= limit {
            break;
        }

        let author = candidate.book.display_author().to_string();
        let decade = candidate.book.decade();
        let series = detect_series(&candidate.book.title).map(|info| text::normalize(&info.name));

        if author_counts.get(&author).copied().unwrap_or(0) >= caps.max_per_author {
            continue;
        }
        if let Some(decade) = decade {
            if decade_counts.get(&decade).copied().unwrap_or(0) >= caps.max_per_decade {
                continue;
            }
        }
        if let Some(series) = &series {
            if series_counts.get(series).copied().unwrap_or(0) >= caps.max_per_series {
                continue;
            }
        }

        *author_counts.entry(author).or_insert(0) += 1;
        if let Some(decade) = decade {
            *decade_counts.entry(decade).or_insert(0) += 1;
        }
        if let Some(series) = series {
            *series_counts.entry(series).or_insert(0) += 1;
        }
        selected.push(candidate);
    }

    selected
}

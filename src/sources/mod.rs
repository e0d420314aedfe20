//! Provider adapters.
//!
//! Each bibliographic provider speaks its own schema; a [`SourceAdapter`]
//! converts one provider's raw payload into the canonical
//! [`CandidateBook`] shape so the scoring engine and diversity selector
//! stay source-agnostic.

pub mod google_books;
pub mod open_library;

pub use google_books::GoogleBooksAdapter;
pub use open_library::OpenLibraryAdapter;

use crate::config::RecommendConfig;
use crate::types::{BookSource, CandidateBook};

/// A pluggable provider adapter.
///
/// Implementors parse a specific provider's response payload and emit
/// canonical candidates. Each adapter handles its own:
///
/// - Wire-schema deserialization
/// - Field mapping into the candidate shape
/// - Discarding records that lack a title or identifier
///
/// All implementations must be `Send + Sync` for use across concurrent
/// query tasks.
pub trait SourceAdapter: Send + Sync {
    /// Returns which [`BookSource`] this adapter normalizes for.
    fn source(&self) -> BookSource;

    /// Convert a raw payload from this provider into canonical candidates.
    ///
    /// Malformed payloads and incomplete records yield fewer candidates,
    /// never an error — acquisition tolerates partial data by design.
    fn normalize(&self, payload: &serde_json::Value, config: &RecommendConfig) -> Vec<CandidateBook>;
}

//! Error types for the book-scout crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Individual provider failures never surface
//! here — they are contained at the query level and contribute no
//! candidates (see [`crate::pipeline::acquire`]).

/// Errors that can occur while producing recommendations.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// No usable seed book could be resolved from the initial search.
    #[error("no seed book found for query: {0}")]
    SeedNotFound(String),

    /// An HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider payload could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid recommendation configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for book-scout results.
pub type Result<T> = std::result::Result<T, RecommendError>;

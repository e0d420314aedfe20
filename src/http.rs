//! Shared HTTP client for provider requests.
//!
//! Provides a configured [`reqwest::Client`] with a crate User-Agent and
//! the per-request timeout from config. Both providers are public JSON
//! APIs; one client is built per pipeline invocation and reused across
//! every concurrent query in that run.

use crate::config::RecommendConfig;
use crate::error::RecommendError;
use std::time::Duration;

/// Identifies this crate to the providers, as their usage policies ask.
const USER_AGENT: &str = concat!("book-scout/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for provider queries.
///
/// The client has:
/// - Timeout from config (applies to every request made with it)
/// - A stable crate User-Agent
/// - Gzip decompression
///
/// # Errors
///
/// Returns [`RecommendError::Http`] if the client cannot be constructed.
pub fn build_client(config: &RecommendConfig) -> Result<reqwest::Client, RecommendError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| RecommendError::Http(format!("failed to build HTTP client: {e}")))
}

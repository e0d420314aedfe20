//! In-memory cache for raw provider payloads.
//!
//! Caches provider responses keyed by (endpoint, normalized query
//! parameters) so that identical queries within the TTL window skip the
//! network entirely. Uses [`moka`] for async-friendly caching with
//! automatic eviction; per-entry TTLs are resolved from the data-class
//! table in config, so search payloads, rating data, and trending data
//! can age out on different schedules.
//!
//! Concurrent requests for the same key are idempotent cache-aside
//! operations: both writers agree on the value shape and the last writer
//! wins.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::Expiry;

/// Maximum number of cached payloads.
const MAX_CACHE_ENTRIES: u64 = 500;

/// Data classes with distinct cache lifetimes (see
/// [`crate::config::CacheTtl`] for the tag-to-TTL table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataClass {
    /// Search-result payloads — turn over within the hour.
    Search,
    /// Rating data — stable for a day.
    Ratings,
    /// Trending data — stale within minutes.
    Trending,
}

/// A cached payload together with the lifetime it was stored under.
#[derive(Debug, Clone)]
struct Entry {
    payload: serde_json::Value,
    ttl: Duration,
}

/// Per-entry expiry policy: each entry lives for the TTL recorded at
/// insertion time.
struct PerEntryTtl;

impl Expiry<CacheKey, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Global process-wide payload cache, lazily initialised on first access.
static CACHE: OnceLock<Cache<CacheKey, Entry>> = OnceLock::new();

fn global_cache() -> &'static Cache<CacheKey, Entry> {
    CACHE.get_or_init(|| {
        Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .expire_after(PerEntryTtl)
            .build()
    })
}

/// Composite cache key: endpoint plus normalized query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The endpoint URL the query targets.
    endpoint: String,
    /// Query parameters serialised as `k=v&k=v`, sorted by key so that
    /// parameter order does not affect the key.
    params: String,
}

impl CacheKey {
    /// Build a deterministic cache key from an endpoint and its query
    /// parameters. Parameters are sorted by name (then value) and keys
    /// are trimmed, so equivalent queries map to the same entry.
    pub fn new(endpoint: &str, params: &[(String, String)]) -> Self {
        let mut sorted: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.trim(), v.as_str()))
            .collect();
        sorted.sort_unstable();
        let params = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        Self {
            endpoint: endpoint.to_string(),
            params,
        }
    }
}

/// Look up a cached payload. Returns `None` on miss or expiry.
pub async fn get(key: &CacheKey) -> Option<serde_json::Value> {
    global_cache().get(key).await.map(|entry| entry.payload)
}

/// Insert a payload under the given TTL. A TTL of zero seconds disables
/// caching for this entry (it is dropped immediately).
pub async fn insert(key: CacheKey, payload: serde_json::Value, ttl_seconds: u64) {
    if ttl_seconds == 0 {
        return;
    }
    let entry = Entry {
        payload,
        ttl: Duration::from_secs(ttl_seconds),
    };
    global_cache().insert(key, entry).await;
}

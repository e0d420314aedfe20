//! Candidate acquisition: concurrent multi-provider fan-out with
//! cache-aside fetching and per-query failure isolation.
//!
//! A bounded batch of independent queries (author, categories, keyword
//! pairs, series, secondary source) is built up front and executed
//! concurrently with [`futures::future::join_all`] — every request is
//! started before any is awaited, and a failing or slow query
//! contributes an empty result instead of cancelling its siblings.
//! Results are normalized through the owning adapter and concatenated;
//! identifier dedup happens downstream.

use crate::cache::{self, CacheKey, DataClass};
use crate::config::RecommendConfig;
use crate::sources::{google_books, open_library, GoogleBooksAdapter, OpenLibraryAdapter, SourceAdapter};
use crate::types::{BookSource, CandidateBook, SeedBook};

/// Leading categories queried individually.
const MAX_CATEGORY_QUERIES: usize = 3;

/// Keywords considered for pairing (two per query).
const MAX_PAIRED_KEYWORDS: usize = 4;

/// One planned provider query.
struct PlannedQuery {
    source: BookSource,
    endpoint: String,
    params: Vec<(String, String)>,
    kind: &'static str,
}

/// Execute the full acquisition batch for a title-seeded run.
///
/// Returns the concatenated candidate pool; an empty vector when every
/// query failed or matched nothing.
pub async fn gather_candidates(
    client: &reqwest::Client,
    seed: &SeedBook,
    config: &RecommendConfig,
) -> Vec<CandidateBook> {
    let plan = build_query_plan(seed, config);
    tracing::debug!(queries = plan.len(), "acquisition batch built");

    let tasks = plan
        .into_iter()
        .map(|query| run_query(client, query, config));
    let outcomes = futures::future::join_all(tasks).await;

    outcomes.into_iter().flatten().collect()
}

/// Build the bounded query batch for a seed.
fn build_query_plan(seed: &SeedBook, config: &RecommendConfig) -> Vec<PlannedQuery> {
    let mut plan = Vec::new();
    let author = seed.primary_author();

    // 1. Works by the same author.
    if let Some(author) = author {
        plan.push(google(config, "author", google_books::author_query(author)));
    }

    // 2. One query per leading category.
    for category in seed.categories.iter().take(MAX_CATEGORY_QUERIES) {
        let leaf = google_books::category_leaf(category);
        plan.push(google(config, "category", google_books::category_query(leaf)));
    }

    // 3. Consecutive keyword pairs.
    let paired = &seed.keywords[..seed.keywords.len().min(MAX_PAIRED_KEYWORDS)];
    for pair in paired.chunks(2) {
        plan.push(google(config, "keywords", google_books::keyword_query(pair)));
    }

    // 4. Same series by the same author, when the title names one.
    if let (Some(series), Some(author)) = (crate::series::detect_series(&seed.title), author) {
        plan.push(google(
            config,
            "series",
            google_books::series_query(&series.name, author),
        ));
    }

    // 5. The secondary source, language-restricted.
    if let Some(params) = open_library::search_query(author, &seed.keywords, config) {
        plan.push(PlannedQuery {
            source: BookSource::OpenLibrary,
            endpoint: config.open_library_url.clone(),
            params,
            kind: "open_library",
        });
    }

    plan
}

fn google(config: &RecommendConfig, kind: &'static str, params: Vec<(String, String)>) -> PlannedQuery {
    PlannedQuery {
        source: BookSource::GoogleBooks,
        endpoint: config.google_books_url.clone(),
        params,
        kind,
    }
}

/// Run one planned query end to end: cache-aside fetch, then adapter
/// normalization. Any failure yields an empty contribution.
async fn run_query(
    client: &reqwest::Client,
    query: PlannedQuery,
    config: &RecommendConfig,
) -> Vec<CandidateBook> {
    let payload =
        fetch_payload(client, &query.endpoint, &query.params, DataClass::Search, config).await;
    let Some(payload) = payload else {
        return Vec::new();
    };

    let candidates = adapter_for(query.source).normalize(&payload, config);
    tracing::debug!(
        source = %query.source,
        kind = query.kind,
        count = candidates.len(),
        "query contributed candidates"
    );
    candidates
}

fn adapter_for(source: BookSource) -> &'static dyn SourceAdapter {
    match source {
        BookSource::GoogleBooks => &GoogleBooksAdapter,
        BookSource::OpenLibrary => &OpenLibraryAdapter,
    }
}

/// Cache-aside fetch of one provider payload.
///
/// On a cache hit the stored payload is returned without touching the
/// network. On a miss the query is issued under the client timeout and
/// the payload is stored with the TTL for `class` before being returned.
/// Timeouts, non-2xx statuses, transport errors, and unparseable bodies
/// all log at warn level and return `None` — a query never raises.
pub(crate) async fn fetch_payload(
    client: &reqwest::Client,
    endpoint: &str,
    params: &[(String, String)],
    class: DataClass,
    config: &RecommendConfig,
) -> Option<serde_json::Value> {
    let key = CacheKey::new(endpoint, params);
    if let Some(payload) = cache::get(&key).await {
        tracing::trace!(endpoint, "payload cache hit");
        return Some(payload);
    }

    let response = match client.get(endpoint).query(params).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "provider request failed");
            return None;
        }
    };
    if !response.status().is_success() {
        tracing::warn!(endpoint, status = %response.status(), "provider returned non-success status");
        return None;
    }
    match response.json::<serde_json::Value>().await {
        Ok(payload) => {
            cache::insert(key, payload.clone(), config.cache_ttl.for_class(class)).await;
            Some(payload)
        }
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "provider payload was not valid JSON");
            None
        }
    }
}

/// Low-frequency enrichment when the acquired pool is short: bestsellers
/// in the seed's leading category, then the author around the seed's
/// publication decade. Sequential on purpose — this path is not
/// latency-critical. A malformed publication year skips the decade query.
pub async fn fallback_candidates(
    client: &reqwest::Client,
    seed: &SeedBook,
    config: &RecommendConfig,
) -> Vec<CandidateBook> {
    let mut extra = Vec::new();

    if let Some(category) = seed.categories.first() {
        let leaf = google_books::category_leaf(category);
        let params = google_books::category_query(leaf);
        if let Some(payload) =
            fetch_payload(client, &config.google_books_url, &params, DataClass::Search, config).await
        {
            extra.extend(GoogleBooksAdapter.normalize(&payload, config));
        }
    }

    if let (Some(author), Some(year)) = (seed.primary_author(), seed.published_year()) {
        let decade = (year / 10) * 10;
        let params = google_books::decade_query(author, decade);
        if let Some(payload) =
            fetch_payload(client, &config.google_books_url, &params, DataClass::Search, config).await
        {
            extra.extend(GoogleBooksAdapter.normalize(&payload, config));
        }
    }

    tracing::debug!(count = extra.len(), "fallback queries contributed candidates");
    extra
}

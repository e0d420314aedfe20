//! Integration tests for the recommendation pipeline.
//!
//! The first half exercises the filter → score → sort → diversify stages
//! on synthetic candidates (no network). The second half runs the whole
//! pipeline end to end against wiremock stand-ins for both providers.

use std::cmp::Ordering;

use book_scout::config::{DiversityCaps, ScoringWeights};
use book_scout::pipeline::{diversity, filter, scoring};
use book_scout::types::{BookSource, CandidateBook, ScoredCandidate, SeedBook};
use book_scout::{recommend, RecommendConfig, RecommendError};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_seed(title: &str, author: &str) -> SeedBook {
    SeedBook {
        title: title.into(),
        authors: vec![author.into()],
        categories: vec!["Fiction / Fantasy".into()],
        description: "A street thief learns allomancy and topples an immortal emperor".into(),
        published_date: "2006".into(),
        keywords: vec!["fantasy".into(), "allomancy".into()],
    }
}

fn make_candidate(id: &str, title: &str, author: &str, date: &str) -> CandidateBook {
    CandidateBook {
        id: id.into(),
        title: title.into(),
        authors: vec![author.into()],
        categories: vec!["Fantasy".into()],
        description: "Allomancy and rebellion shape a crumbling empire".into(),
        language: "es".into(),
        average_rating: 4.2,
        ratings_count: 8_000,
        published_date: date.into(),
        cover_url: None,
        has_rich_metadata: true,
        source: BookSource::GoogleBooks,
    }
}

/// Run the post-acquisition stages the way the coordinator does.
fn run_stages(
    pool: Vec<CandidateBook>,
    seed: &SeedBook,
    query: &str,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let config = RecommendConfig::default();
    let candidates = filter::filter_candidates(pool, seed, query, true, &config);
    let engine = scoring::ScoringEngine::new(ScoringWeights::default());
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|book| {
            let score = engine.score(&book, seed);
            ScoredCandidate { book, score }
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    diversity::select_diverse(scored, &DiversityCaps::default(), limit)
}

#[test]
fn same_series_sequel_outranks_otherwise_identical_candidate() {
    let seed = make_seed("Mistborn, Book 1", "Brandon Sanderson");

    let sequel = make_candidate("seq", "Mistborn, Book 2", "Brandon Sanderson", "2007");
    let mut twin = make_candidate("twin", "The Ashfall Covenant", "Brandon Sanderson", "2007");
    twin.description = sequel.description.clone();

    let engine = scoring::ScoringEngine::new(ScoringWeights::default());
    let sequel_score = engine.score(&sequel, &seed);
    let twin_score = engine.score(&twin, &seed);
    let weights = ScoringWeights::default();
    assert!(
        sequel_score - twin_score >= weights.series_bonus,
        "sequel ({sequel_score}) should lead the non-series twin ({twin_score}) by the series bonus"
    );

    let mut pool = vec![twin, sequel];
    for i in 0..5 {
        pool.push(make_candidate(
            &format!("other-{i}"),
            &format!("Unrelated Tome {i}"),
            &format!("Other Author {i}"),
            &format!("{}", 1950 + i * 12),
        ));
    }
    let selected = run_stages(pool, &seed, "Mistborn: The Final Empire", 4);

    let sequel_pos = selected.iter().position(|c| c.book.id == "seq");
    let twin_pos = selected.iter().position(|c| c.book.id == "twin");
    assert_eq!(sequel_pos, Some(0), "sequel should rank first");
    assert!(twin_pos.is_some(), "twin should still be selected");
    assert!(sequel_pos < twin_pos);
}

#[test]
fn diversity_caps_hold_for_any_pool() {
    let seed = make_seed("Seed Title", "Seed Author");
    let caps = DiversityCaps::default();

    // 30 candidates: clusters per author, per decade, per series.
    let mut pool = Vec::new();
    for i in 0..10 {
        pool.push(make_candidate(
            &format!("same-author-{i}"),
            &format!("Prolific Work {i}"),
            "Prolific Author",
            &format!("{}", 1900 + i * 11),
        ));
    }
    for i in 0..10 {
        pool.push(make_candidate(
            &format!("same-decade-{i}"),
            &format!("Nineties Novel {i}"),
            &format!("Decade Author {i}"),
            "1994",
        ));
    }
    for i in 0..10 {
        pool.push(make_candidate(
            &format!("same-series-{i}"),
            &format!("Gone (#{i})"),
            &format!("Series Author {i}"),
            &format!("{}", 1900 + i * 9),
        ));
    }

    let selected = run_stages(pool, &seed, "Seed Title", 100);

    let mut per_author = std::collections::HashMap::new();
    let mut per_decade = std::collections::HashMap::new();
    let mut per_series = std::collections::HashMap::new();
    for candidate in &selected {
        *per_author
            .entry(candidate.book.display_author().to_string())
            .or_insert(0usize) += 1;
        if let Some(decade) = candidate.book.decade() {
            *per_decade.entry(decade).or_insert(0usize) += 1;
        }
        if let Some(series) = book_scout::series::detect_series(&candidate.book.title) {
            *per_series.entry(series.name).or_insert(0usize) += 1;
        }
    }
    assert!(per_author.values().all(|&n| n <= caps.max_per_author));
    assert!(per_decade.values().all(|&n| n <= caps.max_per_decade));
    assert!(per_series.values().all(|&n| n <= caps.max_per_series));
}

#[test]
fn equal_scores_preserve_acquisition_order() {
    let seed = make_seed("Seed Title", "Seed Author");

    // Identical candidates except id/title → identical scores.
    let pool: Vec<CandidateBook> = (0..6)
        .map(|i| {
            let mut c = make_candidate(
                &format!("tie-{i}"),
                &format!("Tied Entry {i}"),
                &format!("Author {i}"),
                "",
            );
            c.description = String::new();
            c
        })
        .collect();

    let selected = run_stages(pool, &seed, "Seed Title", 6);
    let ids: Vec<&str> = selected.iter().map(|c| c.book.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["tie-0", "tie-1", "tie-2", "tie-3", "tie-4", "tie-5"]
    );
}

#[test]
fn self_match_never_reaches_the_final_list() {
    let seed = make_seed("El Imperio Final", "Brandon Sanderson");
    let pool = vec![
        make_candidate("echo", "El Imperio Finál", "Brandon Sanderson", "2006"),
        make_candidate("keep", "El Pozo de la Ascension", "Brandon Sanderson", "2007"),
    ];
    let selected = run_stages(pool, &seed, "El Imperio Final", 4);
    assert!(selected.iter().all(|c| c.book.id != "echo"));
    assert!(selected.iter().any(|c| c.book.id == "keep"));
}

#[test]
fn sparse_secondary_candidate_competes_via_compensation() {
    let seed = make_seed("El Imperio Final", "Brandon Sanderson");

    let sparse = CandidateBook {
        id: "/works/OL1W".into(),
        title: "El Heroe de las Eras".into(),
        authors: vec!["Brandon Sanderson".into()],
        categories: vec!["Fantasy".into()],
        description: String::new(),
        language: "es".into(),
        average_rating: 0.0,
        ratings_count: 0,
        published_date: "2008".into(),
        cover_url: None,
        has_rich_metadata: false,
        source: BookSource::OpenLibrary,
    };
    let engine = scoring::ScoringEngine::new(ScoringWeights::default());
    let with_compensation = engine.score(&sparse, &seed);

    let mut rich_flagged = sparse.clone();
    rich_flagged.has_rich_metadata = true;
    let without = engine.score(&rich_flagged, &seed);
    // author (30) + category (5) > 30 → the sparse record earns +25.
    assert!((with_compensation - without - 25.0).abs() < 1e-9);

    // It also survives the full stage run against rated competitors.
    let pool = vec![
        sparse,
        make_candidate("rich", "Un Libro Valorado", "Someone Else", "2006"),
    ];
    let selected = run_stages(pool, &seed, "El Imperio Final", 4);
    assert!(selected.iter().any(|c| c.book.id == "/works/OL1W"));
}

// ── End-to-end runs against mocked providers ───────────────────────────

fn mock_config(server: &MockServer) -> RecommendConfig {
    RecommendConfig {
        google_books_url: format!("{}/books/v1/volumes", server.uri()),
        open_library_url: format!("{}/search.json", server.uri()),
        covers_url: format!("{}/covers", server.uri()),
        ..Default::default()
    }
}

fn volume(id: &str, title: &str, author: &str, rating: f64, count: u64, date: &str) -> serde_json::Value {
    json!({
        "id": id,
        "volumeInfo": {
            "title": title,
            "authors": [author],
            "categories": ["Fiction / Fantasy"],
            "description": "Allomancy and rebellion shape a crumbling empire",
            "language": "es",
            "averageRating": rating,
            "ratingsCount": count,
            "publishedDate": date
        }
    })
}

#[tokio::test]
async fn end_to_end_title_seeded_run_ranks_sequel_first() {
    let mock_server = MockServer::start().await;

    // Seed lookup: the exact-phrase attempt resolves.
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "\"Mistborn: The Final Empire\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [volume("gb-seed", "Mistborn, Book 1", "Brandon Sanderson", 4.4, 30_000, "2006")]
        })))
        .mount(&mock_server)
        .await;

    // Author fan-out: the sequel, an otherwise-identical non-series twin,
    // and five unrelated books.
    let mut author_items = vec![
        volume("gb-seq", "Mistborn, Book 2", "Brandon Sanderson", 4.2, 8_000, "2007"),
        volume("gb-twin", "The Ashfall Covenant", "Brandon Sanderson", 4.2, 8_000, "2007"),
    ];
    for i in 0..5 {
        author_items.push(volume(
            &format!("gb-other-{i}"),
            &format!("Unrelated Tome {i}"),
            &format!("Other Author {i}"),
            3.0,
            200,
            &format!("{}", 1950 + i * 12),
        ));
    }
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "inauthor:\"Brandon Sanderson\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": author_items })))
        .mount(&mock_server)
        .await;

    // Open Library contributes nothing; category/keyword queries fall
    // through to the mock server's 404 and are tolerated.
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "docs": [] })))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server);
    let recs = recommend("Mistborn: The Final Empire", &config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(recs.based_on, "Because you read \"Mistborn, Book 1\" by Brandon Sanderson");
    assert_eq!(recs.total, recs.items.len());
    assert!(recs.message.is_none());
    assert!(!recs.items.is_empty());
    assert!(recs.items.len() <= config.final_limit);

    // The same-series sequel leads, ahead of the otherwise-identical twin.
    assert_eq!(recs.items[0].id, "gb-seq");
    let twin_pos = recs.items.iter().position(|r| r.id == "gb-twin");
    assert!(twin_pos.is_some());
    assert!(twin_pos > Some(0));

    // The seed itself never appears.
    assert!(recs.items.iter().all(|r| r.id != "gb-seed"));
}

#[tokio::test]
async fn end_to_end_empty_pool_is_a_successful_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "\"Un Libro Raro\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [volume("gb-seed", "Un Libro Raro", "Autora Rara", 0.0, 0, "1999")]
        })))
        .mount(&mock_server)
        .await;
    // Every acquisition and fallback query 404s; Open Library too.

    let config = mock_config(&mock_server);
    let recs = recommend("Un Libro Raro", &config)
        .await
        .expect("empty pool is not an error");

    assert!(recs.items.is_empty());
    assert_eq!(recs.total, 0);
    assert_eq!(recs.message.as_deref(), Some("No relevant recommendations found."));
}

#[tokio::test]
async fn end_to_end_unresolvable_seed_is_terminal() {
    let mock_server = MockServer::start().await;

    // Both the exact and relaxed seed attempts come back empty.
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server);
    let result = recommend("libro inexistente xyz", &config).await;
    assert!(matches!(result, Err(RecommendError::SeedNotFound(_))));
}

#[tokio::test]
async fn end_to_end_secondary_source_only_still_recommends() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "\"El Imperio Final\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [volume("gb-seed", "El Imperio Final", "Brandon Sanderson", 4.4, 30_000, "2006")]
        })))
        .mount(&mock_server)
        .await;

    // The primary source yields nothing beyond the seed.
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "inauthor:\"Brandon Sanderson\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&mock_server)
        .await;

    // Open Library knows another work by the same author, language-tagged
    // with the provider's three-letter code.
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{
                "key": "/works/OL99W",
                "title": "El Heroe de las Eras",
                "author_name": ["Brandon Sanderson"],
                "subject": ["Fantasy"],
                "first_publish_year": 2008,
                "cover_i": 12345,
                "language": ["spa"]
            }]
        })))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server);
    let recs = recommend("El Imperio Final", &config)
        .await
        .expect("pipeline should succeed");

    let sparse = recs
        .items
        .iter()
        .find(|r| r.id == "/works/OL99W")
        .expect("the compensated secondary-source candidate should be selected");
    assert_eq!(sparse.author, "Brandon Sanderson");
    assert_eq!(sparse.published_date, "2008");
    assert_eq!(
        sparse.cover_url.as_deref(),
        Some(format!("{}/covers/b/id/12345-M.jpg", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn end_to_end_provider_failure_degrades_gracefully() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "\"Canto Nocturno\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [volume("gb-seed", "Canto Nocturno", "Alguna Autora", 4.0, 5_000, "2015")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "inauthor:\"Alguna Autora\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [volume("gb-a", "Otra Novela", "Alguna Autora", 4.1, 3_000, "2017")]
        })))
        .mount(&mock_server)
        .await;

    // The secondary source is down entirely.
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server);
    let recs = recommend("Canto Nocturno", &config)
        .await
        .expect("a failing provider must not fail the run");

    assert!(recs.items.iter().any(|r| r.id == "gb-a"));
}

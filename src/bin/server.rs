//! Thin HTTP entry point over the recommendation pipeline.
//!
//! Exposes one endpoint:
//!
//! - `GET /recommendations?book=<query>` — ranked, diversity-filtered
//!   recommendations for a seed title or topic.
//!
//! Request parsing, input validation, and the response envelope live
//! here; everything with algorithmic weight lives in the library.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use book_scout::{recommend, RecommendConfig, RecommendError};

/// Query parameters accepted by the recommendations endpoint.
#[derive(Debug, Deserialize)]
struct RecommendParams {
    /// The seed query: a book title or a topic.
    #[serde(default)]
    book: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("book_scout=info,info")),
        )
        .init();

    let config = Arc::new(RecommendConfig::default());
    let app = Router::new()
        .route("/recommendations", get(handle_recommendations))
        .with_state(config);

    let bind_addr =
        std::env::var("BOOK_SCOUT_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("book-scout listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_recommendations(
    State(config): State<Arc<RecommendConfig>>,
    Query(params): Query<RecommendParams>,
) -> impl IntoResponse {
    let query = params.book.trim();
    if query.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Type something to search for.");
    }

    match recommend(query, &config).await {
        Ok(recommendations) => (StatusCode::OK, Json(serde_json::json!(recommendations))),
        Err(RecommendError::SeedNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "No results found for that query.")
        }
        Err(e) => {
            tracing::error!(error = %e, "recommendation pipeline failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Recommendations are unavailable right now.",
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}

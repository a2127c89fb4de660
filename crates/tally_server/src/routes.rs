use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::AppState;

/// Builds the full application router: `/api/*` endpoints behind a
/// permissive CORS layer, plus `/health`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route("/count-words", post(handlers::count_words))
        .route("/crawl-article", get(handlers::crawl_article))
        .route("/generate-article", post(handlers::generate_article))
        .route("/llm-count", post(handlers::llm_count))
        .route("/models", get(handlers::list_models))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
}

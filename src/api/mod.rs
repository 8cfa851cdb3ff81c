use axum::{Router, routing::post};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::extractor::ListingExtractor;
use crate::generator::SummaryGenerator;

pub mod handlers;
pub mod models;

/// Shared, read-only collaborators. Intermediate results are never stored here;
/// the page keeps them for the session.
pub struct AppState {
    pub extractor: ListingExtractor,
    pub generator: SummaryGenerator,
}

pub fn create_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/extract", post(handlers::extract_handler))
        .route("/api/generate", post(handlers::generate_handler))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
}

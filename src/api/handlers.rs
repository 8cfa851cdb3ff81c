use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::{DESCRIPTION_NOT_FOUND, PromptRequest};

use super::AppState;
use super::models::{ExtractRequest, ExtractResponse, GenerateRequest, GenerateResponse};

pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, (StatusCode, String)> {
    let url = request.url.trim().to_string();
    if url.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Listing URL cannot be empty".to_string()));
    }

    // failures travel inside the body so the page can offer manual entry
    let result = state.extractor.extract(&url).await;
    Ok(Json(ExtractResponse::new(url, result)))
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let description = request.description.trim();
    if description.is_empty() || description == DESCRIPTION_NOT_FOUND {
        return Err((
            StatusCode::BAD_REQUEST,
            "Paste the listing description before generating a summary".to_string(),
        ));
    }

    let prompt = PromptRequest::new(description, request.source_url);
    let result = state.generator.generate(&prompt).await.map_err(|e| {
        log::error!("summary generation failed: {e}");
        (
            StatusCode::BAD_GATEWAY,
            format!("Generation failed, check the API balance or network. Error: {e}"),
        )
    })?;

    Ok(Json(GenerateResponse {
        text: result.text,
        processing_time_ms: start.elapsed().as_millis(),
    }))
}

use serde::{Deserialize, Serialize};

use crate::data_models::{ExtractionFailure, ExtractionResult};

/// The page shows at most this many photos, three per row.
pub const GALLERY_LIMIT: usize = 12;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub url: String,
    pub description: String,
    pub images: Vec<String>,
    pub total_images: usize,
    pub ready_for_generation: bool,
    pub error: Option<ExtractionFailure>,
}

impl ExtractResponse {
    pub fn new(url: String, result: ExtractionResult) -> ExtractResponse {
        let ready_for_generation = result.ready_for_generation();
        let total_images = result.images.len();
        ExtractResponse {
            url,
            description: result.description,
            images: result.images.into_iter().take(GALLERY_LIMIT).collect(),
            total_images,
            ready_for_generation,
            error: result.error,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    pub processing_time_ms: u128,
}

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Placed in `description` when no rule could locate the listing text. Callers
/// must not forward it to the generator; the page asks for a manual paste instead.
pub const DESCRIPTION_NOT_FOUND: &str =
    "Description was not auto-extracted. Please paste it from the listing page.";

/// Raw fetched document. Lives only for one extraction call.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub url: String,
    pub html: String,
}

impl ListingPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> ListingPage {
        ListingPage {
            url: url.into(),
            html: html.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedListing {
    pub description: String,
    pub images: Vec<String>,
}

impl ExtractedListing {
    pub fn description_found(&self) -> bool {
        self.description != DESCRIPTION_NOT_FOUND
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Caller-owned outcome of one extraction. When `error` is set the other
/// fields are placeholders and `images` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub description: String,
    pub images: Vec<String>,
    pub error: Option<ExtractionFailure>,
}

impl ExtractionResult {
    pub fn failed(error: &ExtractError) -> ExtractionResult {
        let kind = match error {
            ExtractError::Network(_) => FailureKind::Network,
            ExtractError::Parse(_) => FailureKind::Parse,
        };
        ExtractionResult {
            description: DESCRIPTION_NOT_FOUND.to_string(),
            images: Vec::new(),
            error: Some(ExtractionFailure {
                kind,
                message: error.to_string(),
            }),
        }
    }

    /// Gate for the generator call.
    pub fn ready_for_generation(&self) -> bool {
        self.error.is_none() && self.description != DESCRIPTION_NOT_FOUND
    }
}

impl From<Result<ExtractedListing, ExtractError>> for ExtractionResult {
    fn from(res: Result<ExtractedListing, ExtractError>) -> Self {
        match res {
            Ok(listing) => ExtractionResult {
                description: listing.description,
                images: listing.images,
                error: None,
            },
            Err(e) => ExtractionResult::failed(&e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub description: String,
    pub source_url: Option<String>,
}

impl PromptRequest {
    pub fn new(description: impl Into<String>, source_url: Option<String>) -> PromptRequest {
        PromptRequest {
            description: description.into(),
            source_url: source_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
}

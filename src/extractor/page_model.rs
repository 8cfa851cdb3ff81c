use scraper::Html;
use serde::Deserialize;

use crate::data_models::{DESCRIPTION_NOT_FOUND, ExtractedListing};
use crate::error::ExtractError;
use crate::extractor::rules::element_text;

/// Last-resort rule working on the raw page source rather than the markup tree.
pub trait StructuredDataRule: Send + Sync {
    fn name(&self) -> &str;
    fn locate(&self, raw_html: &str) -> Result<Option<ExtractedListing>, ExtractError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageModel {
    #[serde(default)]
    property_data: Option<PropertyData>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyData {
    #[serde(default)]
    text: Option<PropertyText>,
    #[serde(default)]
    images: Vec<PropertyImage>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyText {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyImage {
    #[serde(default)]
    url: Option<String>,
}

/// Reads the state object the listing site serializes into a script tag,
/// e.g. `window.PAGE_MODEL = {...};`.
pub struct PageModelRule {
    marker: String,
}

impl PageModelRule {
    pub fn new(marker: &str) -> PageModelRule {
        PageModelRule {
            marker: marker.to_string(),
        }
    }

    /// Source text right after the assignment marker. The JSON value starts
    /// here and whatever follows its end is ignored.
    pub fn payload<'a>(&self, raw_html: &'a str) -> Option<&'a str> {
        let start = raw_html.find(&self.marker)? + self.marker.len();
        Some(raw_html[start..].trim_start())
    }
}

impl StructuredDataRule for PageModelRule {
    fn name(&self) -> &str {
        &self.marker
    }

    fn locate(&self, raw_html: &str) -> Result<Option<ExtractedListing>, ExtractError> {
        let Some(payload) = self.payload(raw_html) else {
            return Ok(None);
        };

        // only the first value is read, so trailing statements never reach the parser
        let model = serde_json::Deserializer::from_str(payload)
            .into_iter::<PageModel>()
            .next()
            .ok_or_else(|| ExtractError::parse("embedded page state is empty"))?
            .map_err(|e| ExtractError::parse(format!("embedded page state is not valid JSON: {e}")))?;
        let Some(data) = model.property_data else {
            return Ok(None);
        };

        // descriptions are stored as markup fragments (<br />, <b>...)
        let description = data
            .text
            .and_then(|t| t.description)
            .map(|d| {
                let fragment = Html::parse_fragment(&d);
                element_text(fragment.root_element())
            })
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string());
        let images = data.images.into_iter().filter_map(|i| i.url).collect();

        Ok(Some(ExtractedListing {
            description,
            images,
        }))
    }
}

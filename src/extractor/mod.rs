use scraper::Html;

use crate::config::Config;
use crate::data_models::{DESCRIPTION_NOT_FOUND, ExtractedListing, ExtractionResult, ListingPage};
use crate::error::ExtractError;

pub mod fetcher;
pub mod filters;
pub mod page_model;
pub mod rules;

pub use fetcher::PageFetcher;
pub use filters::{
    DedupFilter, HostingPathFilter, ImageFilter, ResolutionMarkerFilter, ResolutionUpgradeFilter,
    apply_filters,
};
pub use page_model::{PageModelRule, StructuredDataRule};
pub use rules::{
    AttributeImageRule, ClassSubstringImageRule, DescriptionRule, ImageRule,
    SelectorDescriptionRule,
};

/// Markup conventions of the listing site the default rule set targets.
pub mod rightmove {
    pub const DESCRIPTION_CLASS: &str = "STw8udCxUaBUMfOOZu0iL";
    pub const IMAGE_HOST: &str = "media.rightmove.co.uk";
    pub const GALLERY_CLASS_MARKERS: [&str; 3] = ["gallery", "carousel", "photo"];
    pub const LOW_RES_MARKER: &str = "_max_135x100";
    pub const HIGH_RES_MARKER: &str = "_max_1024x768";
    pub const RESOLUTION_MARKERS: [&str; 3] = ["_max_1024x768", "_max_656x437", "_max_476x317"];
    pub const PAGE_MODEL_MARKER: &str = "window.PAGE_MODEL = ";
}

/// Ordered rule chains used by [`ListingExtractor`]. Each chain is evaluated
/// front to back, so site-specific rules can be added or swapped here without
/// touching the orchestration.
pub struct ExtractionRules {
    pub description_rules: Vec<Box<dyn DescriptionRule>>,
    pub image_rules: Vec<Box<dyn ImageRule>>,
    pub image_filters: Vec<Box<dyn ImageFilter>>,
    pub structured_rules: Vec<Box<dyn StructuredDataRule>>,
    /// Structured image URLs carry no size segment, so they skip the resolution filters.
    pub structured_image_filters: Vec<Box<dyn ImageFilter>>,
}

impl ExtractionRules {
    pub fn rightmove() -> ExtractionRules {
        use self::rightmove::*;

        ExtractionRules {
            description_rules: vec![
                Box::new(SelectorDescriptionRule::by_class(DESCRIPTION_CLASS)),
                Box::new(SelectorDescriptionRule::by_attribute("itemprop", "description")),
            ],
            image_rules: vec![
                Box::new(AttributeImageRule::new("itemprop", "contentUrl")),
                Box::new(ClassSubstringImageRule::new(&GALLERY_CLASS_MARKERS)),
            ],
            image_filters: vec![
                Box::new(HostingPathFilter::new(IMAGE_HOST)),
                Box::new(ResolutionUpgradeFilter::new(LOW_RES_MARKER, HIGH_RES_MARKER)),
                Box::new(DedupFilter),
                Box::new(ResolutionMarkerFilter::new(&RESOLUTION_MARKERS)),
            ],
            structured_rules: vec![Box::new(PageModelRule::new(PAGE_MODEL_MARKER))],
            structured_image_filters: vec![
                Box::new(HostingPathFilter::new(IMAGE_HOST)),
                Box::new(DedupFilter),
            ],
        }
    }
}

pub struct ListingExtractor {
    fetcher: PageFetcher,
    rules: ExtractionRules,
}

impl ListingExtractor {
    pub fn new(fetcher: PageFetcher, rules: ExtractionRules) -> ListingExtractor {
        ListingExtractor { fetcher, rules }
    }

    pub fn from_config(config: &Config) -> Result<ListingExtractor, ExtractError> {
        let fetcher = PageFetcher::new(&config.user_agent, config.fetch_timeout)?;
        Ok(Self::new(fetcher, ExtractionRules::rightmove()))
    }

    /// Never fails: errors are folded into [`ExtractionResult::error`].
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        let res = self.try_extract(url).await;
        if let Err(e) = &res {
            log::warn!("extraction of {url} failed: {e}");
        }
        ExtractionResult::from(res)
    }

    pub async fn try_extract(&self, url: &str) -> Result<ExtractedListing, ExtractError> {
        log::info!("fetching listing: {url}");
        let page = self.fetcher.fetch(url).await?;
        self.extract_page(&page)
    }

    /// Runs the rule chains over an already fetched page. Any parse failure
    /// discards whatever was found so far.
    pub fn extract_page(&self, page: &ListingPage) -> Result<ExtractedListing, ExtractError> {
        let document = Html::parse_document(&page.html);

        let mut listing = ExtractedListing {
            description: self
                .locate_description(&document)?
                .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string()),
            images: self.locate_images(&document)?,
        };

        if !listing.description_found() && listing.images.is_empty() {
            log::info!("no markup matches on {}, trying embedded page state", page.url);
            if let Some(structured) = self.locate_structured(&page.html)? {
                listing = structured;
            }
        }

        log::info!(
            "extracted {} images from {} (description found: {})",
            listing.images.len(),
            page.url,
            listing.description_found()
        );
        Ok(listing)
    }

    fn locate_description(&self, document: &Html) -> Result<Option<String>, ExtractError> {
        for rule in &self.rules.description_rules {
            if let Some(text) = rule.locate(document)? {
                log::debug!("description matched by {}", rule.name());
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    fn locate_images(&self, document: &Html) -> Result<Vec<String>, ExtractError> {
        for rule in &self.rules.image_rules {
            let candidates = rule.candidates(document)?;
            if !candidates.is_empty() {
                log::debug!("{} image candidates from {}", candidates.len(), rule.name());
                return Ok(apply_filters(&self.rules.image_filters, candidates));
            }
        }
        Ok(Vec::new())
    }

    fn locate_structured(&self, raw_html: &str) -> Result<Option<ExtractedListing>, ExtractError> {
        for rule in &self.rules.structured_rules {
            if let Some(mut listing) = rule.locate(raw_html)? {
                log::debug!("structured data matched by {}", rule.name());
                listing.images = apply_filters(&self.rules.structured_image_filters, listing.images);
                return Ok(Some(listing));
            }
        }
        Ok(None)
    }
}

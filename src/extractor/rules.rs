use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector)
        .map_err(|e| ExtractError::parse(format!("invalid selector {selector:?}: {e}")))
}

/// Text nodes of an element, each trimmed, blank ones dropped, one per line.
pub fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Source of an image element. `src` wins over the lazy-load `data-src`.
pub fn image_source(element: ElementRef) -> Option<String> {
    let value = element.value();
    value
        .attr("src")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| value.attr("data-src").filter(|s| !s.trim().is_empty()))
        .map(|s| s.trim().to_string())
}

/// A description rule tries to locate the listing text in a parsed page.
/// Rules are evaluated in order and the first one returning `Some` wins.
pub trait DescriptionRule: Send + Sync {
    fn name(&self) -> &str;
    fn locate(&self, document: &Html) -> Result<Option<String>, ExtractError>;
}

/// Matches the first element for a CSS selector and takes its text.
pub struct SelectorDescriptionRule {
    name: String,
    selector: String,
}

impl SelectorDescriptionRule {
    pub fn by_class(class: &str) -> SelectorDescriptionRule {
        SelectorDescriptionRule {
            name: format!("class:{class}"),
            selector: format!(".{class}"),
        }
    }

    pub fn by_attribute(attr: &str, value: &str) -> SelectorDescriptionRule {
        SelectorDescriptionRule {
            name: format!("{attr}={value}"),
            selector: format!(r#"[{attr}="{value}"]"#),
        }
    }
}

impl DescriptionRule for SelectorDescriptionRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, document: &Html) -> Result<Option<String>, ExtractError> {
        let selector = parse_selector(&self.selector)?;
        let text = document
            .select(&selector)
            .next()
            .map(element_text)
            // an empty container is not a match, the next rule gets a turn
            .filter(|t| !t.is_empty());
        Ok(text)
    }
}

/// An image rule collects candidate image URLs, in document order.
/// The first rule producing any candidate wins; later rules are not consulted.
pub trait ImageRule: Send + Sync {
    fn name(&self) -> &str;
    fn candidates(&self, document: &Html) -> Result<Vec<String>, ExtractError>;
}

/// `<img>` elements carrying a given attribute value, e.g. `itemprop="contentUrl"`.
pub struct AttributeImageRule {
    name: String,
    selector: String,
}

impl AttributeImageRule {
    pub fn new(attr: &str, value: &str) -> AttributeImageRule {
        AttributeImageRule {
            name: format!("img[{attr}={value}]"),
            selector: format!(r#"img[{attr}="{value}"]"#),
        }
    }
}

impl ImageRule for AttributeImageRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn candidates(&self, document: &Html) -> Result<Vec<String>, ExtractError> {
        let selector = parse_selector(&self.selector)?;
        Ok(document.select(&selector).filter_map(image_source).collect())
    }
}

/// `<img>` elements whose class attribute contains any of the given substrings.
pub struct ClassSubstringImageRule {
    name: String,
    substrings: Vec<String>,
}

impl ClassSubstringImageRule {
    pub fn new(substrings: &[&str]) -> ClassSubstringImageRule {
        ClassSubstringImageRule {
            name: format!("img[class~{}]", substrings.join("|")),
            substrings: substrings.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ImageRule for ClassSubstringImageRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn candidates(&self, document: &Html) -> Result<Vec<String>, ExtractError> {
        let selector = parse_selector("img[class]")?;
        let urls = document
            .select(&selector)
            .filter(|img| {
                let class = img.value().attr("class").unwrap_or_default();
                self.substrings.iter().any(|s| class.contains(s.as_str()))
            })
            .filter_map(image_source)
            .collect();
        Ok(urls)
    }
}

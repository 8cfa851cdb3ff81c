use std::collections::HashSet;

/// An image filter receives the candidate URL list and may drop, rewrite or
/// reorder entries. Filters run in the order they are registered.
pub trait ImageFilter: Send + Sync {
    fn filter(&self, urls: Vec<String>) -> Vec<String>;
}

/// Keeps URLs served from the listing site's image host.
pub struct HostingPathFilter {
    segment: String,
}

impl HostingPathFilter {
    pub fn new(segment: &str) -> HostingPathFilter {
        HostingPathFilter {
            segment: segment.to_string(),
        }
    }
}

impl ImageFilter for HostingPathFilter {
    fn filter(&self, mut urls: Vec<String>) -> Vec<String> {
        urls.retain(|u| u.contains(&self.segment));
        urls
    }
}

/// Literal replace of a thumbnail size segment with a large one.
/// URLs without the low-res segment pass through unchanged.
pub struct ResolutionUpgradeFilter {
    low_res: String,
    high_res: String,
}

impl ResolutionUpgradeFilter {
    pub fn new(low_res: &str, high_res: &str) -> ResolutionUpgradeFilter {
        ResolutionUpgradeFilter {
            low_res: low_res.to_string(),
            high_res: high_res.to_string(),
        }
    }

    pub fn upgrade(&self, url: &str) -> String {
        url.replace(&self.low_res, &self.high_res)
    }
}

impl ImageFilter for ResolutionUpgradeFilter {
    fn filter(&self, urls: Vec<String>) -> Vec<String> {
        urls.into_iter().map(|u| self.upgrade(&u)).collect()
    }
}

/// Removes duplicates, first occurrence wins.
pub struct DedupFilter;

impl ImageFilter for DedupFilter {
    fn filter(&self, urls: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        urls.into_iter()
            .filter(|u| seen.insert(u.clone()))
            .collect()
    }
}

/// Keeps URLs containing at least one known large-size marker.
pub struct ResolutionMarkerFilter {
    markers: Vec<String>,
}

impl ResolutionMarkerFilter {
    pub fn new(markers: &[&str]) -> ResolutionMarkerFilter {
        ResolutionMarkerFilter {
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ImageFilter for ResolutionMarkerFilter {
    fn filter(&self, mut urls: Vec<String>) -> Vec<String> {
        urls.retain(|u| self.markers.iter().any(|m| u.contains(m.as_str())));
        urls
    }
}

pub fn apply_filters(filters: &[Box<dyn ImageFilter>], urls: Vec<String>) -> Vec<String> {
    filters.iter().fold(urls, |urls, f| f.filter(urls))
}

#[test]
fn test_dedup_keeps_first_occurrence_order() {
    let urls = ["A", "B", "A", "C", "B"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(DedupFilter.filter(urls), vec!["A", "B", "C"]);
}

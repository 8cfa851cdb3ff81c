use std::time::Duration;

use crate::data_models::ListingPage;
use crate::error::ExtractError;

/// Single-attempt HTTP GET of a listing page. No retries.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<PageFetcher, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractError::Network(format!("failed to build http client: {e}")))?;
        Ok(PageFetcher { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<ListingPage, ExtractError> {
        let res = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Network(format!("timed out fetching {url}"))
            } else {
                ExtractError::Network(format!("error fetching {url}: {e}"))
            }
        })?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExtractError::Network(format!("{url} returned {status}")));
        }

        let html = res
            .text()
            .await
            .map_err(|e| ExtractError::Network(format!("error reading body of {url}: {e}")))?;
        Ok(ListingPage::new(url, html))
    }
}

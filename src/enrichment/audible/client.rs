//! Audible search HTTP client
//!
//! Fetches `{base}/search?keywords=…` and scrapes the first ASIN from the
//! result page.
//!
//! The storefront serves a reduced page (or a redirect loop) to obvious bots,
//! so requests carry a desktop browser User-Agent instead of our own.

use std::time::Duration;

use super::{AudibleRegion, scrape};
use crate::enrichment::domain::{Asin, EnrichmentError};

/// User agent string - the search page needs to believe we are a browser
pub const BROWSER_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/91.0.4472.124 Safari/537.36"
);

/// Audible search page client
pub struct AudibleClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AudibleClient {
    /// Create a client for a marketplace.
    ///
    /// `timeout` bounds each search request, including reading the body.
    pub fn new(region: AudibleRegion, timeout: Duration) -> Result<Self, EnrichmentError> {
        Self::with_base_url(region.base_url(), timeout)
    }

    /// Create a client against an arbitrary storefront root
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .gzip(true)
            .timeout(timeout)
            .build()
            .map_err(|e| EnrichmentError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search URL for a title/author pair
    pub fn search_url(&self, title: &str, author: &str) -> String {
        format!(
            "{}/search?keywords={}",
            self.base_url,
            urlencoding::encode(&scrape::search_query(title, author))
        )
    }

    /// Search for a title/author pair and return the first ASIN on the page
    pub async fn search(&self, title: &str, author: &str) -> Result<Asin, EnrichmentError> {
        let html = self.fetch_search_page(title, author).await?;
        scrape::extract_asin(&html).ok_or(EnrichmentError::NoMatches)
    }

    async fn fetch_search_page(
        &self,
        title: &str,
        author: &str,
    ) -> Result<String, EnrichmentError> {
        let url = self.search_url(title, author);
        tracing::debug!("Searching Audible: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))
    }
}

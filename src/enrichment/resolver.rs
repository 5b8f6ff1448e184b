//! ASIN resolver - cached, throttled lookups of missing identifiers
//!
//! The flow for a title/author pair:
//! 1. Return the cached outcome if the pair was searched before
//! 2. Wait the politeness delay
//! 3. Search once
//! 4. Cache the outcome, found or not
//!
//! Search failures of any kind degrade to "no ASIN" and are cached like a
//! miss, so a pair is never searched twice.

use std::time::Duration;

use super::cache::AsinCache;
use super::domain::{Asin, CacheEntry, EnrichmentError};
use super::traits::AsinSearch;

/// Delay before each outbound search.
pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_millis(500);

/// Resolves missing ASINs through a search client, backed by the cache.
pub struct AsinResolver<S> {
    search: S,
    cache: AsinCache,
    delay: Duration,
}

impl<S: AsinSearch> AsinResolver<S> {
    pub fn new(search: S, cache: AsinCache) -> Self {
        Self {
            search,
            cache,
            delay: DEFAULT_LOOKUP_DELAY,
        }
    }

    /// Override the delay before each outbound search
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn cache(&self) -> &AsinCache {
        &self.cache
    }

    pub fn search_client(&self) -> &S {
        &self.search
    }

    /// Cached outcome for a pair, with the same normalisation as
    /// [`resolve`](Self::resolve).
    pub fn cached(&self, title: &str, author: &str) -> Option<CacheEntry> {
        self.cache.lookup(title.trim(), author.trim())
    }

    /// Find the ASIN for a title/author pair.
    ///
    /// Surrounding whitespace is ignored, for the cache key and the search.
    /// Returns `None` for a blank title without touching the cache.
    pub async fn resolve(&mut self, title: &str, author: &str) -> Option<Asin> {
        let (title, author) = (title.trim(), author.trim());
        if title.is_empty() {
            return None;
        }

        if let Some(entry) = self.cached(title, author) {
            tracing::debug!("ASIN cache hit for '{}': {:?}", title, entry);
            return entry.into_asin();
        }

        tokio::time::sleep(self.delay).await;

        let result = match self.search.search(title, author).await {
            Ok(asin) => {
                tracing::info!("Auto-matched ASIN {} for '{}'", asin, title);
                Some(asin)
            }
            Err(EnrichmentError::NoMatches) => {
                tracing::debug!("No ASIN found for '{}'", title);
                None
            }
            Err(e) => {
                tracing::warn!("ASIN search failed for '{}': {}", title, e);
                None
            }
        };

        self.cache.record(title, author, result.as_ref());
        result
    }
}

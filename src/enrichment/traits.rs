//! Trait definitions for external search clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`AudibleClient`](super::audible::AudibleClient),
//! while tests substitute [`mocks::MockSearch`].

use async_trait::async_trait;

use super::domain::{Asin, EnrichmentError};

/// Trait for ASIN search by title and author.
#[async_trait]
pub trait AsinSearch: Send + Sync {
    /// Search once for a title/author pair.
    ///
    /// Returns [`EnrichmentError::NoMatches`] if the search ran but found
    /// nothing.
    async fn search(&self, title: &str, author: &str) -> Result<Asin, EnrichmentError>;
}

#[async_trait]
impl AsinSearch for super::audible::AudibleClient {
    async fn search(&self, title: &str, author: &str) -> Result<Asin, EnrichmentError> {
        self.search(title, author).await
    }
}

//! Trait definitions for the library server.
//!
//! The aggregator only needs to page through series and push ASINs back;
//! tests substitute [`mocks::MockLibrary`] for [`AbsClient`].

use async_trait::async_trait;

use super::client::AbsClient;
use super::error::LibraryError;
use crate::enrichment::Asin;
use crate::model::SeriesPage;

/// Trait for the library calls made during aggregation.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Fetch one page of a library's series listing.
    async fn fetch_series_page(
        &self,
        library_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<SeriesPage, LibraryError>;

    /// Store a resolved ASIN on an item. Never fails; returns whether the
    /// server accepted the update.
    async fn write_back(&self, item_id: &str, asin: &Asin) -> bool;
}

#[async_trait]
impl LibraryApi for AbsClient {
    async fn fetch_series_page(
        &self,
        library_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<SeriesPage, LibraryError> {
        self.fetch_series_page(library_id, page, limit).await
    }

    async fn write_back(&self, item_id: &str, asin: &Asin) -> bool {
        self.write_back(item_id, asin).await
    }
}

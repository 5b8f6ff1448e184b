//! Series ASIN aggregation.
//!
//! Walks every series of the requested libraries, fills in missing ASINs
//! and produces a [`SeriesReport`]:
//!
//! ```text
//! AggregationRequest ──► AbsClient ──► SeriesAggregator ──► SeriesReport
//!                                           │
//!                                      AsinResolver (cache + search)
//! ```

mod aggregator;
mod pagination;
mod position;

pub use aggregator::{SeriesAggregator, derive_entries};
pub use pagination::{PAGE_SIZE, PageState, Pagination};
pub use position::series_position;

use serde::Deserialize;
use thiserror::Error;

use crate::enrichment::{AsinResolver, AsinSearch};
use crate::library::{AbsClient, LibraryError};
use crate::model::{LibraryRef, SeriesReport};

/// Input of an aggregation run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRequest {
    /// Library server base URL
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer token for the library server
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Libraries to aggregate, in order
    #[serde(default)]
    pub libraries: Vec<LibraryRef>,
}

impl AggregationRequest {
    pub fn new(
        url: impl Into<String>,
        auth_token: impl Into<String>,
        libraries: Vec<LibraryRef>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            auth_token: Some(auth_token.into()),
            libraries,
        }
    }
}

/// Errors that abort an aggregation run.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Failed to fetch page {page} of library {library_id}: {source}")]
    PageFetch {
        library_id: String,
        page: usize,
        #[source]
        source: LibraryError,
    },

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
}

impl AggregationError {
    /// Page number of a failed page fetch.
    pub fn page(&self) -> Option<usize> {
        match self {
            Self::PageFetch { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Upstream HTTP status, if the library server returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PageFetch { source, .. } | Self::Library(source) => source.status(),
            Self::MissingField(_) => None,
        }
    }
}

/// Aggregate series reports for the libraries in `request`.
///
/// Validates the request before any network call: the URL and token must be
/// present and non-empty.
pub async fn aggregate_series<S: AsinSearch>(
    request: &AggregationRequest,
    resolver: &mut AsinResolver<S>,
) -> Result<SeriesReport, AggregationError> {
    let url = request
        .url
        .as_deref()
        .map(|url| url.trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .ok_or(AggregationError::MissingField("url"))?;
    let token = request
        .auth_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or(AggregationError::MissingField("authToken"))?;

    tracing::info!(
        "Aggregating {} libraries from {}",
        request.libraries.len(),
        url
    );

    let client = AbsClient::new(url)?.with_token(token);
    SeriesAggregator::new(&client, resolver)
        .run(&request.libraries)
        .await
}

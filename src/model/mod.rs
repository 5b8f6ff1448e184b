//! Core data models for series reports.
//!
//! Defines the records read from the library ([`SeriesRecord`],
//! [`BookRecord`]) and the rows of the two reports an aggregation run
//! produces ([`SeriesFirstEntry`], [`SeriesAllEntry`]).
//!
//! Report rows never carry empty values: missing fields are replaced with
//! the sentinel strings below.

use serde::{Deserialize, Serialize};

pub const UNKNOWN_SERIES: &str = "Unknown Series";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ASIN: &str = "Unknown ASIN";
pub const NO_SUBTITLE: &str = "No Subtitle";
pub const NO_POSITION: &str = "N/A";

/// A library to aggregate, as passed in by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl LibraryRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// Library id, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A library on the server, as listed for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySummary {
    pub id: String,
    pub name: String,
    pub media_type: String,
}

/// One page of a library's series listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesPage {
    /// Total series in the library, as reported by the server
    pub total: u64,
    pub series: Vec<SeriesRecord>,
}

/// A series and its books, in series order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRecord {
    pub name: String,
    pub books: Vec<BookRecord>,
}

/// A book as listed inside a series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookRecord {
    /// Library item id (needed for write-back)
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author_name: String,
    /// Identifier already stored in the library, or resolved during this run
    pub asin: Option<String>,
    /// Series name from the book's own metadata, e.g. `"Mystery #1"`
    pub series_name: Option<String>,
    /// Book-level sequence within the series
    pub sequence: Option<String>,
    /// Sequence from the book's metadata
    pub metadata_sequence: Option<String>,
}

impl BookRecord {
    /// Stored identifier, ignoring empty strings.
    pub fn asin(&self) -> Option<&str> {
        self.asin.as_deref().filter(|asin| !asin.trim().is_empty())
    }

    pub fn has_asin(&self) -> bool {
        self.asin().is_some()
    }

    /// Title usable as a search term.
    pub fn search_title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn title_or_default(&self) -> &str {
        non_empty(&self.title).unwrap_or(UNKNOWN_TITLE)
    }

    pub fn subtitle_or_default(&self) -> &str {
        non_empty(&self.subtitle).unwrap_or(NO_SUBTITLE)
    }

    pub fn series_name_or_default(&self) -> &str {
        non_empty(&self.series_name).unwrap_or(UNKNOWN_SERIES)
    }

    pub fn asin_or_default(&self) -> &str {
        self.asin().unwrap_or(UNKNOWN_ASIN)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// First book of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesFirstEntry {
    pub series: String,
    pub title: String,
    pub asin: String,
}

/// One book of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesAllEntry {
    pub series: String,
    pub title: String,
    pub asin: String,
    pub subtitle: String,
    pub series_position: String,
}

/// Output of an aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesReport {
    #[serde(rename = "seriesFirstASIN")]
    pub series_first: Vec<SeriesFirstEntry>,
    #[serde(rename = "seriesAllASIN")]
    pub series_all: Vec<SeriesAllEntry>,
}

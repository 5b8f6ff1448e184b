//! Adapter layer: Convert Audiobookshelf DTOs to domain models
//!
//! This is the ONLY place where library DTO types are converted to domain
//! types, so schema drift on the server only touches this file and dto.rs.

use serde_json::Value;

use super::dto;
use crate::model::{BookRecord, LibrarySummary, SeriesPage, SeriesRecord, UNKNOWN_SERIES};

/// Media type of libraries that hold audiobooks
pub const BOOK_MEDIA_TYPE: &str = "book";

/// Convert a series listing page
pub fn to_series_page(response: dto::SeriesPageResponse) -> SeriesPage {
    SeriesPage {
        total: response.total.unwrap_or(0),
        series: response.results.into_iter().map(to_series_record).collect(),
    }
}

fn to_series_record(series: dto::Series) -> SeriesRecord {
    SeriesRecord {
        name: series.name.unwrap_or_else(|| UNKNOWN_SERIES.to_string()),
        books: series.books.into_iter().map(to_book_record).collect(),
    }
}

fn to_book_record(book: dto::Book) -> BookRecord {
    let meta = book.media.metadata;
    BookRecord {
        id: book.id,
        title: meta.title,
        subtitle: meta.subtitle,
        author_name: meta.author_name.unwrap_or_default(),
        asin: meta.asin,
        series_name: meta.series_name,
        sequence: book.sequence.and_then(render_sequence),
        metadata_sequence: meta.sequence.and_then(render_sequence),
    }
}

/// Render a sequence value as text. The server sends strings, but numbers
/// show up in older data; `null` means no sequence.
pub fn render_sequence(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Keep only audiobook libraries
pub fn to_book_libraries(response: dto::LibrariesResponse) -> Vec<LibrarySummary> {
    response
        .libraries
        .into_iter()
        .filter(|lib| lib.media_type.as_deref() == Some(BOOK_MEDIA_TYPE))
        .filter_map(|lib| {
            Some(LibrarySummary {
                id: lib.id.filter(|id| !id.is_empty())?,
                name: lib.name.unwrap_or_default(),
                media_type: BOOK_MEDIA_TYPE.to_string(),
            })
        })
        .collect()
}

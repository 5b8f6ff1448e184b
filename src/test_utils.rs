//! Test utilities and fixtures for series-minder tests.
//!
//! Builders for library records with sensible defaults. Customize with
//! struct update syntax:
//!
//! ```ignore
//! let custom = BookRecord {
//!     sequence: Some("3".to_string()),
//!     ..mock_book("The Case")
//! };
//! ```

use std::net::{SocketAddr, TcpListener};

use crate::model::{BookRecord, SeriesPage, SeriesRecord};

/// Creates a book without an ASIN, written by "Test Author".
///
/// The item id is derived from the title, e.g. `li_the-case`.
pub fn mock_book(title: &str) -> BookRecord {
    BookRecord {
        id: Some(format!("li_{}", title.to_lowercase().replace(' ', "-"))),
        title: Some(title.to_string()),
        author_name: "Test Author".to_string(),
        ..Default::default()
    }
}

/// Creates a book that already carries an ASIN.
pub fn mock_book_with_asin(title: &str, asin: &str) -> BookRecord {
    BookRecord {
        asin: Some(asin.to_string()),
        ..mock_book(title)
    }
}

/// Creates a series from books.
pub fn mock_series(name: &str, books: Vec<BookRecord>) -> SeriesRecord {
    SeriesRecord {
        name: name.to_string(),
        books,
    }
}

/// Creates `count` single-book series named "Series 0", "Series 1", ...
/// with every book already carrying an ASIN.
pub fn mock_series_batch(start: usize, count: usize) -> Vec<SeriesRecord> {
    (start..start + count)
        .map(|i| {
            mock_series(
                &format!("Series {i}"),
                vec![mock_book_with_asin(&format!("Book {i}"), "B000000000")],
            )
        })
        .collect()
}

/// Creates a series listing page.
pub fn mock_page(total: u64, series: Vec<SeriesRecord>) -> SeriesPage {
    SeriesPage { total, series }
}

/// Starts a local server that accepts connections and never answers.
///
/// Connections are held open for the rest of the test process.
pub fn stalled_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            held.push(stream);
        }
    });
    addr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_book_defaults() {
        let book = mock_book("The Case");
        assert_eq!(book.id.as_deref(), Some("li_the-case"));
        assert_eq!(book.title.as_deref(), Some("The Case"));
        assert_eq!(book.author_name, "Test Author");
        assert!(!book.has_asin());
    }

    #[test]
    fn test_mock_series_batch() {
        let batch = mock_series_batch(20, 3);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].name, "Series 20");
        assert!(batch.iter().all(|s| s.books[0].has_asin()));
    }
}

//! Series aggregator - builds the ASIN reports for a set of libraries.
//!
//! For each library, pages through the series listing. Each series goes
//! through two phases:
//! 1. **Enrich**: books without an ASIN are resolved (cache, then search)
//!    and successful matches are written back to the library
//! 2. **Derive**: report rows are built from the enriched books
//!
//! Everything runs sequentially. Per-book failures only degrade the output to
//! sentinel values; a failed page fetch aborts the run.

use super::AggregationError;
use super::pagination::{PAGE_SIZE, PageState, Pagination};
use super::position::series_position;
use crate::enrichment::{AsinResolver, AsinSearch};
use crate::library::LibraryApi;
use crate::model::{
    BookRecord, LibraryRef, SeriesAllEntry, SeriesFirstEntry, SeriesRecord, SeriesReport,
};

/// Runs aggregation against one library server.
pub struct SeriesAggregator<'a, L, S> {
    library: &'a L,
    resolver: &'a mut AsinResolver<S>,
    page_size: usize,
}

impl<'a, L: LibraryApi, S: AsinSearch> SeriesAggregator<'a, L, S> {
    pub fn new(library: &'a L, resolver: &'a mut AsinResolver<S>) -> Self {
        Self {
            library,
            resolver,
            page_size: PAGE_SIZE,
        }
    }

    /// Aggregate libraries in order. Libraries without an id are skipped.
    ///
    /// Returns the complete report, or the first page fetch error.
    pub async fn run(
        &mut self,
        libraries: &[LibraryRef],
    ) -> Result<SeriesReport, AggregationError> {
        let mut report = SeriesReport::default();

        for library in libraries {
            let Some(library_id) = library.id() else {
                tracing::debug!("Skipping library without id");
                continue;
            };
            self.aggregate_library(library_id, &mut report).await?;
        }

        tracing::info!(
            "Finished fetching. Total Series: {}, Total Books: {}",
            report.series_first.len(),
            report.series_all.len()
        );
        Ok(report)
    }

    async fn aggregate_library(
        &mut self,
        library_id: &str,
        report: &mut SeriesReport,
    ) -> Result<(), AggregationError> {
        let mut pagination = Pagination::new(self.page_size);

        while let PageState::Fetch(page) = pagination.state() {
            let fetched = self
                .library
                .fetch_series_page(library_id, page, self.page_size)
                .await
                .map_err(|source| AggregationError::PageFetch {
                    library_id: library_id.to_string(),
                    page,
                    source,
                })?;

            let result_count = fetched.series.len();
            let mut books_with_asin = 0;
            let mut books_total = 0;

            for series in fetched.series {
                tracing::debug!(
                    "Found series '{}' with {} books.",
                    series.name,
                    series.books.len()
                );

                let enriched = self.enrich_series(series).await;
                books_total += enriched.books.len();
                books_with_asin += enriched.books.iter().filter(|b| b.has_asin()).count();

                let (all, first) = derive_entries(&enriched);
                report.series_all.extend(all);
                report.series_first.extend(first);
            }

            tracing::debug!(
                "Fetched page {} of library {}. Valid ASINs in this batch: {}/{}",
                page,
                library_id,
                books_with_asin,
                books_total
            );

            pagination.advance(result_count, fetched.total);
        }

        tracing::info!(
            "Library {} done ({} series reported by server)",
            library_id,
            pagination.total().unwrap_or_default()
        );
        Ok(())
    }

    /// Enrichment phase for one series; book order is preserved.
    async fn enrich_series(&mut self, series: SeriesRecord) -> SeriesRecord {
        let mut books = Vec::with_capacity(series.books.len());
        for book in series.books {
            books.push(self.enrich_book(book).await);
        }
        SeriesRecord {
            name: series.name,
            books,
        }
    }

    /// Fill in a missing ASIN and push it back to the library.
    ///
    /// Books that already have an ASIN are returned untouched.
    async fn enrich_book(&mut self, mut book: BookRecord) -> BookRecord {
        if book.has_asin() {
            return book;
        }
        let Some(title) = book.search_title() else {
            return book;
        };
        let Some(asin) = self.resolver.resolve(title, &book.author_name).await else {
            return book;
        };

        if let Some(item_id) = book.id.as_deref().filter(|id| !id.is_empty()) {
            // The report uses the resolved ASIN whether or not the library
            // accepted it
            self.library.write_back(item_id, &asin).await;
        }

        book.asin = Some(asin.into());
        book
    }
}

/// Derivation phase: one row per book, plus a first-book row for non-empty
/// series.
pub fn derive_entries(series: &SeriesRecord) -> (Vec<SeriesAllEntry>, Option<SeriesFirstEntry>) {
    let all = series
        .books
        .iter()
        .map(|book| SeriesAllEntry {
            series: series.name.clone(),
            title: book.title_or_default().to_string(),
            asin: book.asin_or_default().to_string(),
            subtitle: book.subtitle_or_default().to_string(),
            series_position: series_position(book),
        })
        .collect();

    let first = series.books.first().map(|book| SeriesFirstEntry {
        series: series.name.clone(),
        title: book.title_or_default().to_string(),
        asin: book.asin_or_default().to_string(),
    });

    (all, first)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::enrichment::traits::mocks::MockSearch;
    use crate::enrichment::{AsinCache, EnrichmentError};
    use crate::library::traits::mocks::MockLibrary;
    use crate::library::{AbsClient, LibraryError};
    use crate::model::{NO_POSITION, NO_SUBTITLE, UNKNOWN_ASIN, UNKNOWN_TITLE};
    use crate::test_utils::{
        mock_book, mock_book_with_asin, mock_page, mock_series, mock_series_batch, stalled_server,
    };

    fn resolver(search: MockSearch) -> AsinResolver<MockSearch> {
        AsinResolver::new(search, AsinCache::in_memory()).with_delay(Duration::ZERO)
    }

    async fn run(
        library: &MockLibrary,
        resolver: &mut AsinResolver<MockSearch>,
        libraries: &[&str],
    ) -> Result<SeriesReport, AggregationError> {
        let refs: Vec<_> = libraries.iter().map(|id| LibraryRef::new(*id)).collect();
        SeriesAggregator::new(library, resolver).run(&refs).await
    }

    #[tokio::test]
    async fn test_end_to_end_single_book() {
        let book = BookRecord {
            id: Some("li_case".to_string()),
            title: Some("The Case".to_string()),
            author_name: "A. Writer".to_string(),
            series_name: Some("Mystery #1".to_string()),
            ..Default::default()
        };
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(1, vec![mock_series("Mystery #1", vec![book])]),
        );
        let mut resolver = resolver(MockSearch::no_matches().with_match("The Case", "B0ABCDEFGH"));

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(
            report.series_all,
            vec![SeriesAllEntry {
                series: "Mystery #1".to_string(),
                title: "The Case".to_string(),
                asin: "B0ABCDEFGH".to_string(),
                subtitle: NO_SUBTITLE.to_string(),
                series_position: "1".to_string(),
            }]
        );
        assert_eq!(
            report.series_first,
            vec![SeriesFirstEntry {
                series: "Mystery #1".to_string(),
                title: "The Case".to_string(),
                asin: "B0ABCDEFGH".to_string(),
            }]
        );
        assert_eq!(
            library.write_backs(),
            vec![("li_case".to_string(), "B0ABCDEFGH".to_string())]
        );
        assert_eq!(
            resolver.search_client().calls.lock().unwrap().clone(),
            vec![("The Case".to_string(), "A. Writer".to_string())]
        );
    }

    #[tokio::test]
    async fn test_existing_asin_has_no_side_effects() {
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(
                1,
                vec![mock_series(
                    "Known",
                    vec![mock_book_with_asin("Owned", "1774241234")],
                )],
            ),
        );
        let mut resolver = resolver(MockSearch::no_matches().with_match("Owned", "B0ABCDEFGH"));

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(report.series_all[0].asin, "1774241234");
        assert_eq!(report.series_first[0].asin, "1774241234");
        assert_eq!(resolver.search_client().call_count(), 0);
        assert!(library.write_backs().is_empty());
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_book_gets_sentinels() {
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(
                1,
                vec![mock_series("Empty Meta", vec![BookRecord::default()])],
            ),
        );
        let mut resolver = resolver(MockSearch::no_matches());

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        let entry = &report.series_all[0];
        assert_eq!(entry.title, UNKNOWN_TITLE);
        assert_eq!(entry.asin, UNKNOWN_ASIN);
        assert_eq!(entry.subtitle, NO_SUBTITLE);
        assert_eq!(entry.series_position, NO_POSITION);
        // No title, so nothing to search for
        assert_eq!(resolver.search_client().call_count(), 0);
        assert!(library.write_backs().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_does_not_abort() {
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(
                1,
                vec![mock_series(
                    "Mixed",
                    vec![mock_book("Offline"), mock_book("Findable")],
                )],
            ),
        );
        let mut resolver = resolver(
            MockSearch::no_matches()
                .with_error("Offline", EnrichmentError::Network("timeout".to_string()))
                .with_match("Findable", "B0FOUND123"),
        );

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(report.series_all[0].asin, UNKNOWN_ASIN);
        assert_eq!(report.series_all[1].asin, "B0FOUND123");
        assert_eq!(report.series_first[0].asin, UNKNOWN_ASIN);
        assert_eq!(library.write_backs().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_back_keeps_resolved_asin() {
        let library = MockLibrary::new()
            .with_page(
                "lib",
                0,
                mock_page(1, vec![mock_series("S", vec![mock_book("Title")])]),
            )
            .failing_write_back();
        let mut resolver = resolver(MockSearch::no_matches().with_match("Title", "B0ABCDEFGH"));

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(report.series_all[0].asin, "B0ABCDEFGH");
        assert_eq!(library.write_backs().len(), 1);
    }

    #[tokio::test]
    async fn test_book_without_item_id_is_not_written_back() {
        let book = BookRecord {
            id: None,
            ..mock_book("Orphan")
        };
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(1, vec![mock_series("S", vec![book])]),
        );
        let mut resolver = resolver(MockSearch::no_matches().with_match("Orphan", "B0ORPHAN12"));

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(report.series_all[0].asin, "B0ORPHAN12");
        assert!(library.write_backs().is_empty());
    }

    #[tokio::test]
    async fn test_first_entry_uses_resolved_first_book() {
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(
                1,
                vec![mock_series(
                    "Saga",
                    vec![mock_book("Part One"), mock_book_with_asin("Part Two", "B0PARTTWO1")],
                )],
            ),
        );
        let mut resolver = resolver(MockSearch::no_matches().with_match("Part One", "B0PARTONE1"));

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(report.series_all.len(), 2);
        assert_eq!(report.series_first.len(), 1);
        assert_eq!(report.series_first[0].title, "Part One");
        assert_eq!(report.series_first[0].asin, "B0PARTONE1");
    }

    #[tokio::test]
    async fn test_empty_series_has_no_first_entry() {
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(
                2,
                vec![
                    mock_series("Empty", vec![]),
                    mock_series("Full", vec![mock_book_with_asin("Only", "B0ONLY1234")]),
                ],
            ),
        );
        let mut resolver = resolver(MockSearch::no_matches());

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(report.series_first.len(), 1);
        assert_eq!(report.series_first[0].series, "Full");
        assert_eq!(report.series_all.len(), 1);
    }

    #[tokio::test]
    async fn test_pagination_fetches_exactly_three_pages_for_45() {
        let library = MockLibrary::new()
            .with_page("lib", 0, mock_page(45, mock_series_batch(0, 20)))
            .with_page("lib", 1, mock_page(45, mock_series_batch(20, 20)))
            .with_page("lib", 2, mock_page(45, mock_series_batch(40, 5)));
        let mut resolver = resolver(MockSearch::no_matches());

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(library.pages_fetched("lib"), vec![0, 1, 2]);
        assert_eq!(report.series_first.len(), 45);
        assert!(
            library
                .fetched
                .lock()
                .unwrap()
                .iter()
                .all(|(_, _, limit)| *limit == PAGE_SIZE)
        );
    }

    #[tokio::test]
    async fn test_empty_page_stops_pagination() {
        let library =
            MockLibrary::new().with_page("lib", 0, mock_page(100, mock_series_batch(0, 20)));
        let mut resolver = resolver(MockSearch::no_matches());

        run(&library, &mut resolver, &["lib"]).await.unwrap();

        // Page 1 is served empty by the mock
        assert_eq!(library.pages_fetched("lib"), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_libraries_processed_in_order() {
        let library = MockLibrary::new()
            .with_page(
                "first",
                0,
                mock_page(
                    1,
                    vec![mock_series("A", vec![mock_book_with_asin("A1", "B0AAAAAAAA")])],
                ),
            )
            .with_page(
                "second",
                0,
                mock_page(
                    1,
                    vec![mock_series("B", vec![mock_book_with_asin("B1", "B0BBBBBBBB")])],
                ),
            );
        let mut resolver = resolver(MockSearch::no_matches());

        let refs = vec![
            LibraryRef::new("first"),
            LibraryRef::default(),
            LibraryRef::new("second"),
        ];
        let report = SeriesAggregator::new(&library, &mut resolver)
            .run(&refs)
            .await
            .unwrap();

        let series: Vec<_> = report.series_first.iter().map(|e| e.series.as_str()).collect();
        assert_eq!(series, vec!["A", "B"]);
        let fetched: Vec<_> = library
            .fetched
            .lock()
            .unwrap()
            .iter()
            .map(|(id, page, _)| (id.clone(), *page))
            .collect();
        assert_eq!(fetched, vec![("first".to_string(), 0), ("second".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_with_page_number() {
        let library = MockLibrary::new()
            .with_page("lib", 0, mock_page(45, mock_series_batch(0, 20)))
            .with_error(
                "lib",
                1,
                LibraryError::Http {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                },
            );
        let mut resolver = resolver(MockSearch::no_matches());

        let err = run(&library, &mut resolver, &["lib"]).await.unwrap_err();

        assert_eq!(err.page(), Some(1));
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("page 1"));
        assert_eq!(library.pages_fetched("lib"), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_stalled_library_server_aborts_with_page_fetch() {
        let addr = stalled_server();
        let client = AbsClient::new(&format!("http://{addr}"))
            .unwrap()
            .with_token("abc")
            .with_timeout(Duration::from_millis(200));
        let mut resolver = resolver(MockSearch::no_matches());

        let err = SeriesAggregator::new(&client, &mut resolver)
            .run(&[LibraryRef::new("lib")])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AggregationError::PageFetch {
                page: 0,
                source: LibraryError::Network(_),
                ..
            }
        ));
        assert_eq!(resolver.search_client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_same_title_resolved_once_across_series() {
        let library = MockLibrary::new().with_page(
            "lib",
            0,
            mock_page(
                2,
                vec![
                    mock_series("Edition A", vec![mock_book("Shared")]),
                    mock_series("Edition B", vec![mock_book("Shared")]),
                ],
            ),
        );
        let mut resolver = resolver(MockSearch::no_matches().with_match("Shared", "B0SHARED12"));

        let report = run(&library, &mut resolver, &["lib"]).await.unwrap();

        assert_eq!(resolver.search_client().call_count(), 1);
        assert!(report.series_all.iter().all(|e| e.asin == "B0SHARED12"));
        // Both items still get the identifier
        assert_eq!(library.write_backs().len(), 2);
    }

    #[test]
    fn test_derive_entries_positions() {
        let series = mock_series(
            "Foo",
            vec![
                BookRecord {
                    sequence: Some("3".to_string()),
                    ..mock_book("Three")
                },
                BookRecord {
                    metadata_sequence: Some("5".to_string()),
                    ..mock_book("Five")
                },
                BookRecord {
                    series_name: Some("Foo #7".to_string()),
                    ..mock_book("Seven")
                },
                mock_book("Unknown"),
            ],
        );

        let (all, first) = derive_entries(&series);

        let positions: Vec<_> = all.iter().map(|e| e.series_position.as_str()).collect();
        assert_eq!(positions, vec!["3", "5", "7", NO_POSITION]);
        assert_eq!(first.unwrap().title, "Three");
    }
}

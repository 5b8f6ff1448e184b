//! Series listing pagination.
//!
//! A small state machine: start at `Fetch(0)`, feed each fetched page to
//! [`Pagination::advance`], stop at `Done`. The server's total is read from
//! the first page only.

/// Series per page request.
pub const PAGE_SIZE: usize = 20;

/// What to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Fetch this page number (0-based)
    Fetch(usize),
    Done,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    page_size: usize,
    total: Option<u64>,
    state: PageState,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            total: None,
            state: PageState::Fetch(0),
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Total reported by the first page, once fetched
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Record the page just fetched and move on.
    ///
    /// Stops when the page was empty or everything up to `total` has been
    /// covered. `reported_total` is ignored after the first page.
    pub fn advance(&mut self, result_count: usize, reported_total: u64) -> PageState {
        let PageState::Fetch(page) = self.state else {
            return PageState::Done;
        };

        let total = *self.total.get_or_insert(reported_total);
        let covered = (page as u64 + 1) * self.page_size as u64;

        self.state = if result_count == 0 || covered >= total {
            PageState::Done
        } else {
            PageState::Fetch(page + 1)
        };
        self.state
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

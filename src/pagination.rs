//! Page tracking for both pagination modes.
//!
//! * **Server**: the API pages the data.  The total comes from the count in
//!   its response and every page change is a new request.
//! * **Client**: the whole collection is held locally.  The total comes from
//!   the number of items that pass the current query, and a page is a slice
//!   of the query output.
//!
//! Pages are 1-based.  Out-of-range requests are clamped into
//! `[1, max(1, total_pages)]`, never rejected.

use clap::ValueEnum;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PaginationMode {
    #[default]
    Server,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    mode: PaginationMode,
    page: usize,
    page_size: usize,
    total_pages: usize,
}

impl Pagination {
    /// A zero page size is treated as 1.
    pub fn new(mode: PaginationMode, page_size: usize) -> Self {
        Self {
            mode,
            page: 1,
            page_size: page_size.max(1),
            total_pages: 0,
        }
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Pages needed for `count` items.
    pub fn pages_for(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Record a new item count and pull the current page back into range.
    ///
    /// In server mode `count` is the server's total; in client mode it is the
    /// number of items that passed the query.
    pub fn set_total_count(&mut self, count: usize) {
        self.total_pages = self.pages_for(count);
        self.page = self.clamp(self.page);
    }

    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages.max(1))
    }

    /// Move to `page` (clamped).  Returns whether the page actually changed.
    pub fn request_page(&mut self, page: usize) -> bool {
        let target = self.clamp(page);
        let changed = target != self.page;
        self.page = target;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        self.request_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.request_page(self.page.saturating_sub(1))
    }

    /// Back to page 1, used whenever a filter changes.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// The part of `items` that belongs on the current page.
    ///
    /// Server-paged data is already a single page and is returned whole.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self.mode {
            PaginationMode::Server => items,
            PaginationMode::Client => {
                let start = (self.page - 1)
                    .saturating_mul(self.page_size)
                    .min(items.len());
                let end = start.saturating_add(self.page_size).min(items.len());
                &items[start..end]
            }
        }
    }
}

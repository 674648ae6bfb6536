//! Feed client abstraction layer.
//!
//! This module defines the [`FeedClient`] trait, the request/response types
//! that cross it, and the common [`FeedItem`] type.  The HTTP implementation
//! for the messages API lives in [`api`].
//!
//! ## For contributors: adding a new backend
//!
//! 1. Create a new file in this directory.
//! 2. Define a struct and implement [`FeedClient`] for it.
//! 3. Re-export it below and construct it in `main.rs`.
//!
//! The fetch worker, query engine, and UI never look past this trait.

mod api;
mod feed_item;

pub use api::{parse_response, query_params, ApiClient, DEFAULT_API_URL, FETCH_ALL_PAGE_SIZE};
pub use feed_item::{parse_timestamp, priority_rank, AdditionalSource, FeedItem};

use crate::error::FetchError;
use crate::query::QuerySpec;

/// One page of items, filtered and ordered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub spec: QuerySpec,
}

/// What the fetch worker should ask a [`FeedClient`] for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    /// A single server-filtered page (server pagination).
    Page(PageRequest),
    /// The whole unfiltered collection (client pagination).
    Everything,
}

/// A decoded response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    /// The server's total across all pages, when the response carried one.
    pub count: Option<usize>,
}

impl FeedPage {
    /// The server's count, or the number of items when it sent a bare array.
    pub fn total_count(&self) -> usize {
        self.count.unwrap_or(self.items.len())
    }
}

/// Trait that every feed backend must implement.
///
/// Calls happen on the fetch worker's blocking pool, so implementations must
/// be [`Send`] + [`Sync`] and may block.
pub trait FeedClient: Send + Sync {
    /// Human-readable label shown in the status bar.
    fn name(&self) -> &str;

    /// Fetch one page with the query applied server-side.
    fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage, FetchError>;

    /// Fetch the whole collection with no filters.  `count` is the server's
    /// total; it exceeds the number of items when the collection came back
    /// incomplete.
    fn fetch_all(&self) -> Result<FeedPage, FetchError>;

    fn fetch(&self, query: &FeedQuery) -> Result<FeedPage, FetchError> {
        match query {
            FeedQuery::Page(request) => self.fetch_page(request),
            FeedQuery::Everything => self.fetch_all(),
        }
    }
}

//! InfoSphere: a terminal dashboard for a categorized message feed.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs  │ ────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)   │ (channel) │ (state)  │          │ (render) │
//! └───────────┘           └──────────┘          └──────────┘
//!       ▲  FetchRequest        │ ▲
//!       └──────────────────────┘ │ handle_key_event()
//!                           ┌──────────┐
//!                           │ input.rs │
//!                           └──────────┘
//! ```
//!
//! * **`source/`**: the `FeedClient` trait, the `FeedItem` model, and the
//!   HTTP client for the messages API.
//! * **`query`**: search, filter, and stable sort over a collection.
//! * **`facets`**: distinct category/priority values for filter choices.
//! * **`links`**: deduplicated, labelled source links for one message.
//! * **`pagination`**: page tracking for server- and client-side paging.
//! * **`fetch`**: background fetch worker with request tokens.
//! * **`app`**: owns all dashboard state and the memoized query view.
//! * **`ui`** / **`input`**: rendering and key handling.
//! * **`config`**: flags and environment.

pub mod app;
pub mod config;
pub mod error;
pub mod facets;
pub mod fetch;
pub mod input;
pub mod links;
pub mod pagination;
pub mod query;
pub mod source;
pub mod ui;

pub use error::FetchError;
pub use facets::{extract, FacetField, Facets};
pub use links::{resolve, SourceLink};
pub use pagination::{Pagination, PaginationMode};
pub use query::{apply, QuerySpec, SortKey, SortOrder};
pub use source::FeedItem;

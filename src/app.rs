use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::facets::{self, FacetField, Facets};
use crate::fetch::{FetchMsg, FetchRequest, RequestTokens};
use crate::links::{self, SourceLink};
use crate::pagination::{Pagination, PaginationMode};
use crate::query::{self, QuerySpec};
use crate::source::{FeedItem, FeedPage, FeedQuery, PageRequest};

/// What keystrokes currently edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typed characters go into the search text.
    Search,
}

/// The query output for one `(collection, spec)` pair.
#[derive(Debug, Default)]
struct View {
    key: Option<(u64, QuerySpec)>,
    /// Positions into `App::items`, in display order.
    indices: Vec<usize>,
}

pub struct App {
    /// The collection from the latest accepted fetch.  Replaced wholesale.
    items: Vec<FeedItem>,
    /// Bumped every time `items` is replaced; keys the memoized view.
    generation: u64,
    spec: QuerySpec,
    pagination: Pagination,
    facets: Facets,
    view: View,
    tokens: RequestTokens,
    /// A fetch should be issued on the next tick.
    fetch_wanted: bool,
    loading: bool,
    /// List selection state for scrolling within the current page.
    pub list_state: ListState,
    pub input_mode: InputMode,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last fetch status message.
    pub status: String,
    /// Last fetch error, cleared by the next successful fetch.
    pub error: Option<String>,
    /// Label of the feed backend, shown in the status bar.
    pub source_name: String,
}

impl App {
    pub fn new(mode: PaginationMode, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
            spec: QuerySpec::default(),
            pagination: Pagination::new(mode, page_size),
            facets: Facets::default(),
            view: View::default(),
            tokens: RequestTokens::default(),
            fetch_wanted: true,
            loading: true,
            list_state: ListState::default(),
            input_mode: InputMode::Normal,
            quit: false,
            status: "Starting…".into(),
            error: None,
            source_name: String::new(),
        }
    }

    /// Start from `spec` instead of the default query.
    pub fn with_spec(mut self, spec: QuerySpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // -- fetching ------------------------------------------------------------

    /// The request to send to the fetch worker, if one is due.
    ///
    /// Each call that returns a request issues a fresh token, which makes
    /// every earlier request stale.
    pub fn take_fetch_request(&mut self) -> Option<FetchRequest> {
        if !std::mem::take(&mut self.fetch_wanted) {
            return None;
        }
        self.loading = true;
        let query = match self.pagination.mode() {
            PaginationMode::Server => FeedQuery::Page(PageRequest {
                page: self.pagination.page(),
                page_size: self.pagination.page_size(),
                spec: self.spec.clone(),
            }),
            PaginationMode::Client => FeedQuery::Everything,
        };
        Some(FetchRequest {
            token: self.tokens.issue(),
            query,
        })
    }

    /// Apply a finished fetch.  Returns `false` if it was stale and dropped.
    pub fn apply_fetch(&mut self, msg: FetchMsg) -> bool {
        if !self.tokens.is_current(msg.token) {
            debug!(token = ?msg.token, "discarding stale fetch result");
            return false;
        }
        self.loading = false;
        match msg.result {
            Ok(page) => {
                let count = page.items.len();
                let total = page.total_count();
                let truncated =
                    self.pagination.mode() == PaginationMode::Client && total > count;
                self.replace_items(page);
                self.error = None;
                self.status = if truncated {
                    warn!(held = count, total, "collection is incomplete");
                    format!("Fetched {count} of {total} items (incomplete)")
                } else {
                    format!("Fetched {count} items")
                };
            }
            Err(e) => {
                warn!(error = %e, "fetch failed");
                self.status = format!("Error: {e}");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Ask for the current query to be fetched again.
    pub fn refresh(&mut self) {
        self.fetch_wanted = true;
    }

    fn replace_items(&mut self, page: FeedPage) {
        if self.pagination.mode() == PaginationMode::Server {
            self.pagination.set_total_count(page.total_count());
        }
        self.items = page.items;
        self.generation += 1;
        self.facets = Facets::from_items(&self.items);
        self.refresh_view();
    }

    // -- derived view --------------------------------------------------------

    /// Re-run the query engine if the collection or spec changed since the
    /// last run.
    fn refresh_view(&mut self) {
        let key = (self.generation, self.spec.clone());
        if self.view.key.as_ref() != Some(&key) {
            self.view.indices = query::apply_indices(&self.items, &self.spec);
            self.view.key = Some(key);
        }
        if self.pagination.mode() == PaginationMode::Client {
            self.pagination.set_total_count(self.view.indices.len());
        }
        self.reset_selection();
    }

    /// Number of items passing the query across the held collection.
    pub fn visible_count(&self) -> usize {
        self.view.indices.len()
    }

    /// The items shown on the current page, in display order.
    pub fn page_items(&self) -> Vec<&FeedItem> {
        self.pagination
            .slice(&self.view.indices)
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        let selected = self.list_state.selected()?;
        self.page_items().get(selected).copied()
    }

    pub fn selected_sources(&self) -> Vec<SourceLink> {
        self.selected_item().map(links::resolve).unwrap_or_default()
    }

    // -- query changes -------------------------------------------------------

    fn update_spec(&mut self, change: impl FnOnce(&mut QuerySpec)) {
        let before = self.spec.clone();
        change(&mut self.spec);
        if self.spec == before {
            return;
        }
        self.pagination.reset();
        match self.pagination.mode() {
            // The held page was filtered for the old spec; keep showing it
            // until the server answers for the new one.
            PaginationMode::Server => self.fetch_wanted = true,
            PaginationMode::Client => self.refresh_view(),
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        self.update_spec(|spec| spec.search.push(c));
    }

    pub fn pop_search_char(&mut self) {
        self.update_spec(|spec| {
            spec.search.pop();
        });
    }

    pub fn clear_search(&mut self) {
        self.update_spec(|spec| spec.search.clear());
    }

    /// Move the category or priority filter to the next offered value.
    pub fn cycle_facet(&mut self, field: FacetField) {
        let values = self.facets.values(field);
        match field {
            FacetField::Category => {
                let next = facets::next_value(values, &self.spec.category);
                self.update_spec(|spec| spec.category = next);
            }
            FacetField::Priority => {
                let next = facets::next_value(values, &self.spec.priority);
                self.update_spec(|spec| spec.priority = next);
            }
        }
    }

    pub fn cycle_sort_key(&mut self) {
        self.update_spec(|spec| spec.sort_key = spec.sort_key.next());
    }

    pub fn toggle_sort_order(&mut self) {
        self.update_spec(|spec| spec.sort_order = spec.sort_order.toggle());
    }

    // -- paging --------------------------------------------------------------

    pub fn next_page(&mut self) {
        let changed = self.pagination.next_page();
        self.page_changed(changed);
    }

    pub fn prev_page(&mut self) {
        let changed = self.pagination.prev_page();
        self.page_changed(changed);
    }

    /// Switch pages.  Out-of-range pages are clamped.
    pub fn go_to_page(&mut self, page: usize) {
        let changed = self.pagination.request_page(page);
        self.page_changed(changed);
    }

    fn page_changed(&mut self, changed: bool) {
        if !changed {
            return;
        }
        match self.pagination.mode() {
            PaginationMode::Server => self.fetch_wanted = true,
            PaginationMode::Client => self.reset_selection(),
        }
    }

    // -- navigation ----------------------------------------------------------

    fn page_len(&self) -> usize {
        self.pagination.slice(&self.view.indices).len()
    }

    fn reset_selection(&mut self) {
        let first = (self.page_len() > 0).then_some(0);
        self.list_state.select(first);
    }

    pub fn select_next(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.page_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.page_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.page_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}

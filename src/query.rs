//! The query engine: search, filter, and sort a collection of messages.
//!
//! [`apply`] is a pure function of `(items, spec)`.  It never mutates its
//! input and calling it twice with the same arguments yields the same order.
//!
//! ## Filter
//!
//! An item is kept when all three hold:
//!
//! * the search text is empty, or it is a case-insensitive substring of the
//!   item's title, content, or author;
//! * the category filter is `"all"` or equals the item's category exactly;
//! * the priority filter is `"all"` or equals the item's priority exactly.
//!
//! ## Sort
//!
//! One key, no secondary tie-break.  The sort is stable, so items that
//! compare equal stay in the order the filter produced them.

use std::cmp::Ordering;
use std::fmt;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::source::FeedItem;

/// Sentinel filter value that matches every item.
pub const ALL: &str = "all";

/// Which field the visible list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Date,
    Title,
    Priority,
}

impl SortKey {
    /// Parse a sort key name.  Unknown names fall back to [`SortKey::Date`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Self::Title,
            "priority" => Self::Priority,
            _ => Self::Date,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Priority => "priority",
        }
    }

    /// The next key in `date → title → priority → date` order.
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Title,
            Self::Title => Self::Priority,
            Self::Priority => Self::Date,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `"asc"` is ascending; everything else is descending.
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Everything the user controls about what is visible.
///
/// A plain value: it owns no items and can be re-applied to any collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    pub search: String,
    pub category: String,
    pub priority: String,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
            priority: ALL.to_string(),
            sort_key: SortKey::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

impl QuerySpec {
    /// The API's `ordering` parameter: the sort key, `-`-prefixed when
    /// descending.
    pub fn ordering(&self) -> String {
        match self.sort_order {
            SortOrder::Asc => self.sort_key.as_str().to_string(),
            SortOrder::Desc => format!("-{}", self.sort_key),
        }
    }

    /// Whether `item` passes the search, category, and priority filters.
    pub fn matches(&self, item: &FeedItem) -> bool {
        self.matches_search(item)
            && filter_matches(&self.category, item.category.as_deref())
            && filter_matches(&self.priority, item.priority.as_deref())
    }

    fn matches_search(&self, item: &FeedItem) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&item.title, &item.content, &item.author]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Compare two items under this spec's sort key and direction.
    ///
    /// Missing fields never panic: absent titles compare as empty, unknown
    /// priorities rank 0, and items without a usable date compare equal to
    /// each other and below every dated item.
    pub fn compare(&self, a: &FeedItem, b: &FeedItem) -> Ordering {
        let ordering = match self.sort_key {
            SortKey::Title => locale_cmp(
                a.title.as_deref().unwrap_or_default(),
                b.title.as_deref().unwrap_or_default(),
            ),
            SortKey::Priority => a.priority_rank().cmp(&b.priority_rank()),
            SortKey::Date => a.effective_date().cmp(&b.effective_date()),
        };
        self.sort_order.apply(ordering)
    }
}

fn filter_matches(filter: &str, value: Option<&str>) -> bool {
    filter == ALL || value == Some(filter)
}

/// Dictionary order: accents and case are ignored first, then unaccented
/// sorts before accented, then lowercase before uppercase.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// `s` decomposed, stripped of combining marks, and lowercased.
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Positions in `items` that pass `spec`, in display order.
pub fn apply_indices(items: &[FeedItem], spec: &QuerySpec) -> Vec<usize> {
    let mut visible: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| spec.matches(item))
        .map(|(i, _)| i)
        .collect();
    // `sort_by` is stable.
    visible.sort_by(|&a, &b| spec.compare(&items[a], &items[b]));
    visible
}

/// Filter then stably sort `items` under `spec`.
pub fn apply<'a>(items: &'a [FeedItem], spec: &QuerySpec) -> Vec<&'a FeedItem> {
    apply_indices(items, spec)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

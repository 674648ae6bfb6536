//! Filter choices derived from the data currently held.

use std::collections::HashSet;

use crate::query::ALL;
use crate::source::FeedItem;

/// A field that can be used as a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetField {
    Category,
    Priority,
}

impl FacetField {
    fn value(self, item: &FeedItem) -> Option<&str> {
        match self {
            Self::Category => item.category.as_deref(),
            Self::Priority => item.priority.as_deref(),
        }
    }
}

/// `["all", ...]` followed by every distinct non-empty value of `field`, in
/// order of first appearance.
pub fn extract(items: &[FeedItem], field: FacetField) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = vec![ALL.to_string()];
    for value in items.iter().filter_map(|item| field.value(item)) {
        if !value.is_empty() && seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Category and priority choices for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub priorities: Vec<String>,
}

impl Default for Facets {
    fn default() -> Self {
        Self::from_items(&[])
    }
}

impl Facets {
    pub fn from_items(items: &[FeedItem]) -> Self {
        Self {
            categories: extract(items, FacetField::Category),
            priorities: extract(items, FacetField::Priority),
        }
    }

    pub fn values(&self, field: FacetField) -> &[String] {
        match field {
            FacetField::Category => &self.categories,
            FacetField::Priority => &self.priorities,
        }
    }
}

/// The choice after `current` in `values`, wrapping around.
///
/// A `current` that is no longer offered moves back to `"all"`.
pub fn next_value(values: &[String], current: &str) -> String {
    match values.iter().position(|v| v == current) {
        Some(i) => values[(i + 1) % values.len()].clone(),
        None => ALL.to_string(),
    }
}

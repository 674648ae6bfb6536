//! Source-link resolution.
//!
//! A message can carry its external references in up to four places:
//! `url`, `source_url`, `link`, and the `additional_sources` list.  These
//! often repeat the same address.  [`resolve`] flattens them into one list,
//! in that priority order, keeping only the first entry for any given URL.

use std::collections::HashSet;

use crate::source::FeedItem;

/// One labelled external reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub label: String,
    pub url: String,
}

/// Collect an item's links, deduplicated by exact URL.
///
/// Empty strings count as absent, for both URLs and names.
pub fn resolve(item: &FeedItem) -> Vec<SourceLink> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let mut push = |url: Option<&str>, label: String| {
        if let Some(url) = non_empty(url) {
            if seen.insert(url.to_string()) {
                links.push(SourceLink {
                    label,
                    url: url.to_string(),
                });
            }
        }
    };

    let source_name = non_empty(item.source_name.as_deref());
    push(
        item.url.as_deref(),
        source_name.unwrap_or("Original Source").to_string(),
    );
    push(
        item.source_url.as_deref(),
        source_name.unwrap_or("Alternative Source").to_string(),
    );
    push(
        item.link.as_deref(),
        non_empty(item.link_name.as_deref())
            .unwrap_or("Related Link")
            .to_string(),
    );
    for (i, extra) in item.additional_sources.iter().enumerate() {
        let label = match non_empty(extra.name.as_deref()) {
            Some(name) => name.to_string(),
            None => format!("Additional Source {}", i + 1),
        };
        push(extra.url.as_deref(), label);
    }

    links
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

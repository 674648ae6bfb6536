// tests/engine.rs
//
// End-to-end checks of the engine through the public library API: a JSON
// page as the messages API would send it, run through decoding, query,
// facets, link resolution, and pagination.
//
// Covered:
// - title / priority sorting of the two-item fixture
// - duplicate source links
// - category facets with repeats and nulls
// - page clamping against a server count
// - case-insensitive search
// - determinism and stability across repeated runs

use infosphere::source::parse_response;
use infosphere::{
    apply, extract, resolve, FacetField, FeedItem, Pagination, PaginationMode, QuerySpec,
    SortKey, SortOrder,
};

fn titles(items: &[&FeedItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.title.clone().unwrap_or_default())
        .collect()
}

fn fixture() -> Vec<FeedItem> {
    let body = r#"[
        {"id": 1, "title": "Zeta", "priority": "low", "created_at": "2024-01-01"},
        {"id": 2, "title": "Alpha", "priority": "high", "created_at": "2024-02-01"}
    ]"#;
    parse_response(body).expect("fixture decodes").items
}

#[test]
fn sort_by_title_ascending() {
    let items = fixture();
    let spec = QuerySpec {
        sort_key: SortKey::Title,
        sort_order: SortOrder::Asc,
        ..Default::default()
    };
    assert_eq!(titles(&apply(&items, &spec)), ["Alpha", "Zeta"]);
}

#[test]
fn sort_by_priority_descending() {
    let items = fixture();
    let spec = QuerySpec {
        sort_key: SortKey::Priority,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };
    assert_eq!(titles(&apply(&items, &spec)), ["Alpha", "Zeta"]);
}

#[test]
fn duplicate_links_collapse() {
    let body = r#"[{"id": 1, "url": "https://a", "source_url": "https://a", "link": "https://b"}]"#;
    let items = parse_response(body).expect("decodes").items;
    let links = resolve(&items[0]);

    assert_eq!(links.len(), 2);
    assert_eq!((links[0].label.as_str(), links[0].url.as_str()), ("Original Source", "https://a"));
    assert_eq!((links[1].label.as_str(), links[1].url.as_str()), ("Related Link", "https://b"));
}

#[test]
fn category_facets() {
    let body = r#"{"count": 4, "results": [
        {"id": 1, "category": "tech"},
        {"id": 2, "category": "tech"},
        {"id": 3, "category": "news"},
        {"id": 4, "category": null}
    ]}"#;
    let items = parse_response(body).expect("decodes").items;
    assert_eq!(extract(&items, FacetField::Category), ["all", "tech", "news"]);
}

#[test]
fn page_requests_clamp_to_server_total() {
    let page = parse_response(r#"{"count": 25, "results": []}"#).expect("decodes");
    let mut pagination = Pagination::new(PaginationMode::Server, 10);
    pagination.set_total_count(page.total_count());

    assert_eq!(pagination.total_pages(), 3);
    pagination.request_page(5);
    assert_eq!(pagination.page(), 3);
}

#[test]
fn search_ignores_case() {
    let items = vec![FeedItem {
        id: "1".into(),
        title: Some("ALPHA release".into()),
        ..Default::default()
    }];
    let spec = QuerySpec {
        search: "alpha".into(),
        ..Default::default()
    };
    assert_eq!(apply(&items, &spec).len(), 1);
}

#[test]
fn repeated_runs_are_identical_and_stable() {
    let items: Vec<FeedItem> = (0..40)
        .map(|i| FeedItem {
            id: i.to_string(),
            priority: Some(["high", "medium", "low", "unknown"][i % 4].to_string()),
            ..Default::default()
        })
        .collect();
    let spec = QuerySpec {
        sort_key: SortKey::Priority,
        ..Default::default()
    };

    let first = apply(&items, &spec);
    let second = apply(&items, &spec);
    assert_eq!(first, second);

    // Equal priorities keep their input order.
    for window in first.windows(2) {
        let (a, b) = (window[0], window[1]);
        if a.priority == b.priority {
            let (ia, ib): (usize, usize) = (a.id.parse().unwrap(), b.id.parse().unwrap());
            assert!(ia < ib, "{} should precede {}", a.id, b.id);
        }
    }
}

//! HTTP client for the messages API.
//!
//! Requests carry `page`, `page_size`, `search`, `category`, `priority`, and
//! `ordering` query parameters.  The response is either a paginated envelope
//! `{"count": n, "results": [...]}` or a bare array of messages; anything
//! else is a [`FetchError::Malformed`].
//!
//! The whole collection is fetched by walking pages of
//! [`FETCH_ALL_PAGE_SIZE`] until the envelope's count is reached.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::{FeedClient, FeedItem, FeedPage, PageRequest};
use crate::error::FetchError;
use crate::query::ALL;

/// Where the messages API lives when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/messages/";

/// Page size used when walking the whole collection.
pub const FETCH_ALL_PAGE_SIZE: usize = 100;

/// A [`FeedClient`] backed by a blocking [`reqwest`] client.
pub struct ApiClient {
    base_url: String,
    label: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        label: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            label: label.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, params: &[(&str, String)]) -> Result<FeedPage, FetchError> {
        debug!(url = %self.base_url, ?params, "requesting feed");
        let response = self.http.get(&self.base_url).query(params).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "feed API returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text()?;
        parse_response(&body)
    }
}

impl FeedClient for ApiClient {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage, FetchError> {
        self.get(&query_params(request))
    }

    fn fetch_all(&self) -> Result<FeedPage, FetchError> {
        let mut items = Vec::new();
        let mut page = 1usize;
        loop {
            let batch = self.get(&[
                ("page", page.to_string()),
                ("page_size", FETCH_ALL_PAGE_SIZE.to_string()),
            ])?;
            // A bare array is the whole collection.
            let Some(count) = batch.count else {
                items.extend(batch.items);
                return Ok(FeedPage { items, count: None });
            };
            let exhausted = batch.items.is_empty();
            items.extend(batch.items);
            if exhausted || items.len() >= count {
                debug!(pages = page, held = items.len(), count, "fetched collection");
                return Ok(FeedPage {
                    items,
                    count: Some(count),
                });
            }
            page += 1;
        }
    }
}

/// The query string for a page request.  `"all"` filters are sent empty.
pub fn query_params(request: &PageRequest) -> Vec<(&'static str, String)> {
    let filter = |value: &str| {
        if value == ALL {
            String::new()
        } else {
            value.to_string()
        }
    };
    vec![
        ("page", request.page.to_string()),
        ("page_size", request.page_size.to_string()),
        ("search", request.spec.search.clone()),
        ("category", filter(&request.spec.category)),
        ("priority", filter(&request.spec.priority)),
        ("ordering", request.spec.ordering()),
    ]
}

/// Decode a response body into a [`FeedPage`].
///
/// This is a pure function (no I/O) so that tests can exercise decoding
/// without a server.  Items that fail to decode make the whole response
/// malformed rather than being skipped.
pub fn parse_response(body: &str) -> Result<FeedPage, FetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("invalid JSON: {e}")))?;

    match value {
        Value::Array(_) => Ok(FeedPage {
            items: decode_items(value)?,
            count: None,
        }),
        Value::Object(mut envelope) => {
            let results = match envelope.remove("results") {
                Some(results @ Value::Array(_)) => results,
                _ => {
                    return Err(FetchError::malformed(
                        "expected an array of messages from the server",
                    ))
                }
            };
            let items = decode_items(results)?;
            let count = match envelope.get("count") {
                None | Some(Value::Null) => None,
                Some(count) => Some(
                    count
                        .as_u64()
                        .and_then(|c| usize::try_from(c).ok())
                        .ok_or_else(|| {
                            FetchError::malformed(format!(
                                "count must be a non-negative integer, got {count}"
                            ))
                        })?,
                ),
            };
            Ok(FeedPage { items, count })
        }
        _ => Err(FetchError::malformed(
            "expected an array of messages from the server",
        )),
    }
}

fn decode_items(array: Value) -> Result<Vec<FeedItem>, FetchError> {
    serde_json::from_value(array)
        .map_err(|e| FetchError::malformed(format!("undecodable message: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

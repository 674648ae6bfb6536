//! The message type delivered by the feed API.
//!
//! `FeedItem` mirrors one entry of the `/api/messages/` payload.  Every field
//! except `id` is optional: the API omits or nulls fields freely, and nothing
//! downstream (query engine, facets, link resolution, rendering) is allowed
//! to fail because one is missing.
//!
//! ## For contributors
//!
//! Timestamps are kept as the raw strings the server sent and parsed on
//! demand through [`parse_timestamp`].  A value that does not parse is
//! treated exactly like a missing one.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One extra reference attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdditionalSource {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single message, as decoded from the feed API.
///
/// Field names follow the API's snake_case keys; camelCase aliases are
/// accepted so payloads from either convention decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    /// Opaque identifier.  The API sends integers; strings are accepted too.
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,

    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,

    /// Short classification tag, compared case-sensitively.
    pub category: Option<String>,

    /// Conventionally one of `high`, `medium`, `low`.  See [`priority_rank`].
    pub priority: Option<String>,

    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,

    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,

    // -- link fields, resolved by `crate::links::resolve` --------------------
    pub url: Option<String>,
    #[serde(default, alias = "sourceUrl")]
    pub source_url: Option<String>,
    #[serde(default, alias = "sourceName")]
    pub source_name: Option<String>,
    pub link: Option<String>,
    #[serde(default, alias = "linkName")]
    pub link_name: Option<String>,
    #[serde(default, alias = "additionalSources", deserialize_with = "null_as_default")]
    pub additional_sources: Vec<AdditionalSource>,

    #[serde(default, alias = "isRead", deserialize_with = "null_as_default")]
    pub is_read: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl FeedItem {
    /// The single date used for date sorting and display.
    ///
    /// `published_at` wins when it parses; otherwise `created_at` is used.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_at.as_deref().and_then(parse_timestamp))
    }

    /// The update timestamp, but only when it is a different instant from
    /// the creation timestamp.
    pub fn updated_date(&self) -> Option<DateTime<Utc>> {
        let updated = self.updated_at.as_deref().and_then(parse_timestamp)?;
        let created = self.created_at.as_deref().and_then(parse_timestamp);
        (created != Some(updated)).then_some(updated)
    }

    /// Numeric rank of this item's priority tag.
    pub fn priority_rank(&self) -> u8 {
        self.priority.as_deref().map_or(0, priority_rank)
    }
}

/// `high` = 3, `medium` = 2, `low` = 1, anything else = 0.
pub fn priority_rank(priority: &str) -> u8 {
    match priority {
        "high" => 3,
        "medium" => 2,
        "low" => 1,
        _ => 0,
    }
}

/// Parse an API timestamp into an instant.
///
/// Accepts RFC 3339 (`2024-02-01T09:30:00Z`, with any offset), a naive
/// date-time (`2024-02-01T09:30:00` or with a space separator, taken as UTC)
/// and a bare date (`2024-02-01`, midnight UTC).  Anything else is `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Int(n)) => n.to_string(),
        Some(RawId::Float(n)) => n.to_string(),
        Some(RawId::Text(s)) => s,
        None => String::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_snake_case_api_payload() {
        let json = r#"{
            "id": 42,
            "title": "Rates hold",
            "content": "Body",
            "created_at": "2024-02-01T09:30:00Z",
            "updated_at": "2024-02-01T09:30:00Z",
            "is_read": false,
            "priority": "high",
            "source_name": "Wire",
            "author": null,
            "url": "https://a.example/1",
            "image_url": null,
            "published_at": null,
            "category": "economy"
        }"#;

        let item: FeedItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, "42");
        assert_eq!(item.title.as_deref(), Some("Rates hold"));
        assert_eq!(item.category.as_deref(), Some("economy"));
        assert!(item.author.is_none());
        assert!(item.additional_sources.is_empty());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn decodes_camel_case_aliases_and_string_ids() {
        let json = r#"{
            "id": "abc",
            "createdAt": "2024-01-01",
            "sourceUrl": "https://b.example",
            "additionalSources": [{"url": "https://c.example"}],
            "isRead": true
        }"#;

        let item: FeedItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, "abc");
        assert_eq!(item.created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(item.source_url.as_deref(), Some("https://b.example"));
        assert_eq!(item.additional_sources.len(), 1);
        assert!(item.additional_sources[0].name.is_none());
        assert!(item.is_read);
    }

    #[test]
    fn null_collections_decode_as_empty() {
        let json = r#"{"id": 1, "additional_sources": null, "tags": null, "is_read": null}"#;
        let item: FeedItem = serde_json::from_str(json).unwrap();
        assert!(item.additional_sources.is_empty());
        assert!(item.tags.is_empty());
        assert!(!item.is_read);
    }

    #[test]
    fn parses_supported_timestamp_shapes() {
        let midnight = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-02-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-02-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-02-01 00:00:00.000"), Some(midnight));
        assert_eq!(parse_timestamp("2024-02-01T01:00:00+01:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-02-01T00:00:00Z"), Some(midnight));
    }

    #[test]
    fn unparseable_timestamps_are_absent() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn effective_date_prefers_published() {
        let item = FeedItem {
            created_at: Some("2024-01-01".into()),
            published_at: Some("2024-03-01".into()),
            ..Default::default()
        };
        assert_eq!(
            item.effective_date(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn effective_date_falls_back_when_published_is_garbage() {
        let item = FeedItem {
            created_at: Some("2024-01-01".into()),
            published_at: Some("not a date".into()),
            ..Default::default()
        };
        assert_eq!(
            item.effective_date(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn updated_date_hidden_when_same_instant_as_created() {
        let item = FeedItem {
            created_at: Some("2024-01-01T10:00:00Z".into()),
            updated_at: Some("2024-01-01T11:00:00+01:00".into()),
            ..Default::default()
        };
        assert!(item.updated_date().is_none());

        let edited = FeedItem {
            updated_at: Some("2024-01-02T10:00:00Z".into()),
            ..item
        };
        assert!(edited.updated_date().is_some());
    }

    #[test]
    fn priority_ranks() {
        assert_eq!(priority_rank("high"), 3);
        assert_eq!(priority_rank("medium"), 2);
        assert_eq!(priority_rank("low"), 1);
        assert_eq!(priority_rank("HIGH"), 0);
        assert_eq!(FeedItem::default().priority_rank(), 0);
    }
}

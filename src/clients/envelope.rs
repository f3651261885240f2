//! Envelope and pagination types shared by every resource handler.
//!
//! Responses from the control plane wrap their payload: single resources
//! under a named key, collections under a named key plus a `"meta"` cursor,
//! and action acknowledgements as a small `{"message": "..."}` object. This
//! module holds the shared pieces of that contract and the decode helper
//! that turns raw bytes into typed envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clients::errors::DecodeError;

/// Cursor links for a paginated collection.
///
/// Cursor values are provider-issued opaque tokens. The client never
/// interprets them; it only checks for emptiness and passes them back as the
/// `cursor` query parameter of the next request. An empty string means "no
/// further page in that direction".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Cursor for the next page, or empty when on the last page.
    #[serde(default)]
    pub next: String,
    /// Cursor for the previous page, or empty when on the first page.
    #[serde(default)]
    pub prev: String,
}

/// Pagination metadata attached to every collection response.
///
/// Traversal is caller-driven: reissue the same list call with
/// [`Meta::next_cursor`] until it returns `None`. The SDK never fetches a
/// full collection behind a single call.
///
/// # Example
///
/// ```rust,ignore
/// let mut options = ListOptions::default();
/// loop {
///     let (page, meta) = databases.list(Some(&options)).await?;
///     all.extend(page);
///     match meta.as_ref().and_then(Meta::next_cursor) {
///         Some(cursor) => options.cursor = Some(cursor.to_string()),
///         None => break,
///     }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Total number of items in the collection, across all pages.
    #[serde(default)]
    pub total: u64,
    /// Cursor links for the surrounding pages.
    #[serde(default)]
    pub links: Links,
}

impl Meta {
    /// Returns the cursor for the next page, or `None` on the last page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if self.links.next.is_empty() {
            None
        } else {
            Some(&self.links.next)
        }
    }

    /// Returns the cursor for the previous page, or `None` on the first page.
    #[must_use]
    pub fn prev_cursor(&self) -> Option<&str> {
        if self.links.prev.is_empty() {
            None
        } else {
            Some(&self.links.prev)
        }
    }
}

/// Common query options accepted by every list endpoint.
///
/// Unset fields are omitted from the query string entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Number of items to return per page.
    pub per_page: Option<u32>,
    /// Opaque cursor from a previous page's [`Meta`].
    pub cursor: Option<String>,
    /// Filter by resource label.
    pub label: Option<String>,
    /// Filter by resource tag.
    pub tag: Option<String>,
    /// Filter by region identifier.
    pub region: Option<String>,
}

impl ListOptions {
    /// Renders the options as query parameters, skipping unset fields.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        if let Some(label) = &self.label {
            pairs.push(("label".to_string(), label.clone()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag".to_string(), tag.clone()));
        }
        if let Some(region) = &self.region {
            pairs.push(("region".to_string(), region.clone()));
        }
        pairs
    }
}

/// Envelope for action-only endpoints.
///
/// Maintenance starts and version upgrades acknowledge with
/// `{"message": "..."}` instead of a resource payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// The provider's acknowledgement text.
    pub message: String,
}

/// Decodes a response body into the expected envelope shape.
///
/// Unknown extra fields are tolerated for forward compatibility; a missing
/// required key or malformed JSON is a [`DecodeError`], which keeps "the
/// server reported a failure" ([`ApiError`](crate::ApiError)) distinguishable
/// from "the server's success response was unparseable".
///
/// # Errors
///
/// Returns [`DecodeError`] when `body` is not valid JSON for `T`, including
/// when `body` is empty.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(DecodeError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_cursors_present() {
        let meta: Meta = serde_json::from_value(serde_json::json!({
            "total": 25,
            "links": {"next": "bmV4dF9fMjM=", "prev": "cHJldl9fMQ=="}
        }))
        .unwrap();

        assert_eq!(meta.total, 25);
        assert_eq!(meta.next_cursor(), Some("bmV4dF9fMjM="));
        assert_eq!(meta.prev_cursor(), Some("cHJldl9fMQ=="));
    }

    #[test]
    fn test_empty_cursor_means_no_page() {
        let meta: Meta = serde_json::from_value(serde_json::json!({
            "total": 2,
            "links": {"next": "", "prev": ""}
        }))
        .unwrap();

        assert_eq!(meta.next_cursor(), None);
        assert_eq!(meta.prev_cursor(), None);
    }

    #[test]
    fn test_meta_tolerates_missing_fields() {
        let meta: Meta = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(meta.total, 0);
        assert_eq!(meta.next_cursor(), None);
    }

    #[test]
    fn test_meta_tolerates_unknown_fields() {
        let meta: Meta = serde_json::from_value(serde_json::json!({
            "total": 1,
            "links": {"next": "", "prev": "", "last": "ignored"},
            "page_size": 100
        }))
        .unwrap();
        assert_eq!(meta.total, 1);
    }

    #[test]
    fn test_list_options_skips_unset_fields() {
        let options = ListOptions {
            label: Some("prod".to_string()),
            ..ListOptions::default()
        };

        assert_eq!(
            options.to_query_pairs(),
            vec![("label".to_string(), "prod".to_string())]
        );
    }

    #[test]
    fn test_list_options_full() {
        let options = ListOptions {
            per_page: Some(50),
            cursor: Some("abc".to_string()),
            label: Some("prod".to_string()),
            tag: Some("blue".to_string()),
            region: Some("ewr".to_string()),
        };

        let pairs = options.to_query_pairs();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], ("per_page".to_string(), "50".to_string()));
        assert_eq!(pairs[1], ("cursor".to_string(), "abc".to_string()));
    }

    #[test]
    fn test_decode_json_valid_envelope() {
        let envelope: MessageEnvelope =
            decode_json(br#"{"message": "maintenance started"}"#).unwrap();
        assert_eq!(envelope.message, "maintenance started");
    }

    #[test]
    fn test_decode_json_tolerates_extra_fields() {
        let envelope: MessageEnvelope =
            decode_json(br#"{"message": "ok", "debug_id": "abc"}"#).unwrap();
        assert_eq!(envelope.message, "ok");
    }

    #[test]
    fn test_decode_json_rejects_missing_required_key() {
        let result = decode_json::<MessageEnvelope>(br#"{"note": "ok"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_json_rejects_malformed_body() {
        let result = decode_json::<MessageEnvelope>(b"<html>502</html>");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_json_rejects_empty_body() {
        let result = decode_json::<MessageEnvelope>(b"");
        assert!(result.is_err());
    }
}

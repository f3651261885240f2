//! Response types for the Nimbus API SDK.
//!
//! This module provides the [`RawResponse`] type: the transport-level view
//! of a response before the envelope codec decodes it into a typed value.

use std::collections::HashMap;
use std::time::Duration;

/// A raw HTTP response from the Nimbus API.
///
/// Holds the status code, the lower-cased response headers, and the
/// undecoded body bytes. Classification (success, rate limited, API error)
/// happens on this type; typed decoding happens afterwards in the envelope
/// codec.
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lower-cased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body. May be empty for delete/detach operations.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a new `RawResponse`.
    #[must_use]
    pub const fn new(status: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns `true` if the status code signals success.
    ///
    /// The API uses 200/201/202 for payload-bearing successes and 204 for
    /// empty-body successes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201 | 202 | 204)
    }

    /// Returns the first value of the named (lower-cased) header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the provider's retry hint from the `Retry-After` header.
    ///
    /// The provider sends the hint in seconds. Unparseable values are
    /// treated as absent so the backoff policy falls back to its own delays.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Returns the `X-Request-Id` header value, if present.
    ///
    /// Useful for correlating failed calls with provider-side logs.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}

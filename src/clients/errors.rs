//! Error types for API calls.
//!
//! This module contains the error taxonomy for dispatched requests. Every
//! failure mode of a call maps to exactly one variant of [`ClientError`],
//! and a failed call never returns a partial result.
//!
//! # Error Handling
//!
//! - [`ApiError`]: the server answered with a non-2xx status
//! - [`RateLimitError`]: HTTP 429 persisted past the retry budget
//! - [`DecodeError`]: a 2xx response whose body did not match the expected envelope
//! - [`InvalidRequestError`]: the request failed validation before being sent
//! - [`ClientError`]: unified error type encompassing all of the above, plus
//!   transport failures and cancellation
//!
//! # Example
//!
//! ```rust,ignore
//! use nimbus_api::{ClientError, Dispatch};
//!
//! match client.dispatch::<DatabaseEnvelope>(request).await {
//!     Ok(envelope) => println!("Database: {:?}", envelope),
//!     Err(ClientError::Api(e)) => println!("API error {}: {}", e.status, e.message),
//!     Err(ClientError::RateLimit(e)) => println!("Throttled after {} attempts", e.attempts),
//!     Err(ClientError::Decode(e)) => println!("Unparseable success response: {}", e),
//!     Err(ClientError::Cancelled { phase }) => println!("Cancelled during {phase}"),
//!     Err(e) => println!("Other failure: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the API answers with a non-2xx status code.
///
/// Carries the HTTP status, the provider's message, and the provider's
/// machine-readable error code when the response body included one. When the
/// error body cannot be decoded, the message is synthesized from the status
/// line instead.
///
/// # Example
///
/// ```rust
/// use nimbus_api::ApiError;
///
/// let error = ApiError {
///     status: 404,
///     message: "not found".to_string(),
///     code: None,
/// };
///
/// assert_eq!(error.to_string(), "API error 404: not found");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("API error {status}: {message}")]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The provider's error message.
    pub message: String,
    /// The provider's error code, when present in the response body.
    pub code: Option<String>,
}

/// Error returned when HTTP 429 responses persisted past the retry budget.
///
/// `attempts` counts every transport call made for the logical request,
/// including the first one, so a budget of 3 retries yields `attempts == 4`.
///
/// # Example
///
/// ```rust
/// use nimbus_api::RateLimitError;
///
/// let error = RateLimitError {
///     attempts: 4,
///     message: "rate limit exceeded".to_string(),
/// };
///
/// assert!(error.to_string().contains("4 attempts"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Rate limited by the API after {attempts} attempts. Last message: {message}")]
pub struct RateLimitError {
    /// Total number of transport calls made before giving up.
    pub attempts: u32,
    /// The last rate-limit message observed, or the status line if the
    /// throttled response had no decodable body.
    pub message: String,
}

/// Error returned when a 2xx response body cannot be parsed into the
/// expected envelope shape.
///
/// Distinct from [`ApiError`]: this means the server reported success but
/// sent something this client cannot interpret (malformed JSON, or a missing
/// envelope key).
#[derive(Debug, Error)]
#[error("Failed to decode success response: {source}")]
pub struct DecodeError {
    /// The underlying deserialization failure.
    #[from]
    pub source: serde_json::Error,
}

/// Error returned when a request fails validation before being sent.
///
/// These are caller bugs, not server conditions, and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// The request path is empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// The request path does not resolve against the base URL.
    #[error("Invalid request path: {path}")]
    InvalidPath {
        /// The path that failed to resolve.
        path: String,
    },

    /// A body was supplied for a method that never carries one.
    #[error("Cannot send a body with {method} requests.")]
    BodyNotAllowed {
        /// The offending HTTP method.
        method: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Request body could not be serialized: {reason}")]
    UnserializableBody {
        /// The serializer's failure message.
        reason: String,
    },
}

/// Unified error type for all API call failures.
///
/// Result and error are mutually exclusive outcomes: a call either yields a
/// fully decoded value or exactly one of these variants. The dispatch core
/// never swallows or logs away an error.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request validation failed before anything was sent.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Connection, DNS, or read failure at the transport level.
    ///
    /// Never retried by this layer; callers that want transport-level
    /// retries layer their own policy on top.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status other than 429.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// HTTP 429 persisted past the retry budget.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    /// A 2xx response body did not match the expected envelope shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The call's deadline elapsed, either during the network round trip or
    /// during a retry backoff sleep.
    #[error("The call's deadline elapsed during the {phase} phase")]
    Cancelled {
        /// Which suspension point observed the deadline: `"transport"` or
        /// `"backoff"`.
        phase: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status_and_message() {
        let error = ApiError {
            status: 404,
            message: "not found".to_string(),
            code: None,
        };
        assert_eq!(error.to_string(), "API error 404: not found");
    }

    #[test]
    fn test_api_error_preserves_provider_code() {
        let error = ApiError {
            status: 403,
            message: "forbidden".to_string(),
            code: Some("NIMBUS-403-QUOTA".to_string()),
        };
        assert_eq!(error.code.as_deref(), Some("NIMBUS-403-QUOTA"));
    }

    #[test]
    fn test_rate_limit_error_includes_attempt_count() {
        let error = RateLimitError {
            attempts: 4,
            message: "rate limit exceeded".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("4 attempts"));
        assert!(message.contains("rate limit exceeded"));
    }

    #[test]
    fn test_decode_error_wraps_serde_failure() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = DecodeError { source };
        assert!(error.to_string().contains("Failed to decode"));
    }

    #[test]
    fn test_invalid_request_error_messages() {
        assert_eq!(
            InvalidRequestError::EmptyPath.to_string(),
            "Request path cannot be empty."
        );
        assert_eq!(
            InvalidRequestError::BodyNotAllowed {
                method: "get".to_string()
            }
            .to_string(),
            "Cannot send a body with get requests."
        );
    }

    #[test]
    fn test_cancelled_names_the_phase() {
        let error = ClientError::Cancelled { phase: "backoff" };
        assert!(error.to_string().contains("backoff"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let api: &dyn std::error::Error = &ApiError {
            status: 400,
            message: "bad request".to_string(),
            code: None,
        };
        let _ = api;

        let rate: &dyn std::error::Error = &RateLimitError {
            attempts: 2,
            message: "slow down".to_string(),
        };
        let _ = rate;

        let invalid: &dyn std::error::Error = &InvalidRequestError::EmptyPath;
        let _ = invalid;
    }

    #[test]
    fn test_client_error_from_conversions() {
        let api = ApiError {
            status: 500,
            message: "server error".to_string(),
            code: None,
        };
        assert!(matches!(ClientError::from(api), ClientError::Api(_)));

        let invalid = InvalidRequestError::EmptyPath;
        assert!(matches!(
            ClientError::from(invalid),
            ClientError::InvalidRequest(_)
        ));
    }
}

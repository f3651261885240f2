//! Request types for the Nimbus API SDK.
//!
//! This module provides the [`ApiRequest`] type and its builder for
//! describing a single call to the control-plane API. A request is immutable
//! once built and dispatched.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::clients::errors::InvalidRequestError;

/// HTTP methods supported by the Nimbus API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and triggering actions.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A single request to the Nimbus API.
///
/// Use [`ApiRequest::builder`] to construct requests with the builder
/// pattern. The body, when present, is already serialized to a JSON value so
/// dispatch cannot fail on encoding.
///
/// # Example
///
/// ```rust
/// use nimbus_api::{ApiRequest, HttpMethod};
/// use serde_json::json;
///
/// // GET request with a pagination cursor
/// let list = ApiRequest::builder(HttpMethod::Get, "/v2/databases")
///     .query_param("cursor", "bmV4dF9fMjM=")
///     .build()
///     .unwrap();
///
/// // POST request with a typed body
/// let create = ApiRequest::builder(HttpMethod::Post, "/v2/databases")
///     .json(&json!({"label": "prod-db"}))
///     .unwrap()
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The resource path, relative to the configured base URL.
    pub path: String,
    /// Query parameters to append to the URL, in insertion order.
    pub query: Vec<(String, String)>,
    /// The serialized request body, if any.
    pub body: Option<serde_json::Value>,
    /// Optional per-call deadline, measured from dispatch.
    ///
    /// Covers the whole logical call, including any retry backoff sleeps.
    pub deadline: Option<Duration>,
}

impl ApiRequest {
    /// Creates a new builder for constructing an `ApiRequest`.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method for the request
    /// * `path` - The resource path, relative to the base URL
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the path is empty, or if a body is
    /// present on a GET request.
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if self.path.trim_matches('/').is_empty() {
            return Err(InvalidRequestError::EmptyPath);
        }

        if self.body.is_some() && self.method == HttpMethod::Get {
            return Err(InvalidRequestError::BodyNotAllowed {
                method: self.method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`ApiRequest`] instances.
///
/// Provides a fluent API for building requests with optional parameters.
#[derive(Debug)]
pub struct ApiRequestBuilder {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    deadline: Option<Duration>,
}

impl ApiRequestBuilder {
    /// Creates a new builder with the required method and path.
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            deadline: None,
        }
    }

    /// Serializes `body` to JSON and attaches it to the request.
    ///
    /// Optional fields of `body` that are `None` are omitted from the
    /// encoded payload entirely, which is how partial-update requests
    /// distinguish "leave unchanged" from "explicitly clear".
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::UnserializableBody`] if `body` cannot
    /// be represented as JSON.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, InvalidRequestError> {
        let value = serde_json::to_value(body).map_err(|e| {
            InvalidRequestError::UnserializableBody {
                reason: e.to_string(),
            }
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attaches an already-serialized JSON body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds several query parameters at once, preserving order.
    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a deadline for the whole logical call.
    ///
    /// The deadline covers every transport round trip and any retry backoff
    /// sleep. When it elapses the call resolves to
    /// [`ClientError::Cancelled`](crate::ClientError::Cancelled).
    #[must_use]
    pub const fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builds the [`ApiRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn build(self) -> Result<ApiRequest, InvalidRequestError> {
        let request = ApiRequest {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            deadline: self.deadline,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Put.to_string(), "put");
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = ApiRequest::builder(HttpMethod::Get, "/v2/databases")
            .build()
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/v2/databases");
        assert!(request.body.is_none());
        assert!(request.deadline.is_none());
    }

    #[test]
    fn test_builder_creates_valid_post_request_with_typed_body() {
        #[derive(Serialize)]
        struct CreateReq {
            label: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            region: Option<String>,
        }

        let request = ApiRequest::builder(HttpMethod::Post, "/v2/databases")
            .json(&CreateReq {
                label: "prod-db".to_string(),
                region: None,
            })
            .unwrap()
            .build()
            .unwrap();

        // The unset region must not appear in the encoded body at all.
        assert_eq!(request.body, Some(json!({"label": "prod-db"})));
    }

    #[test]
    fn test_verify_rejects_empty_path() {
        let result = ApiRequest::builder(HttpMethod::Get, "").build();
        assert!(matches!(result, Err(InvalidRequestError::EmptyPath)));

        let result = ApiRequest::builder(HttpMethod::Get, "/").build();
        assert!(matches!(result, Err(InvalidRequestError::EmptyPath)));
    }

    #[test]
    fn test_verify_rejects_body_on_get() {
        let result = ApiRequest::builder(HttpMethod::Get, "/v2/databases")
            .body(json!({"label": "x"}))
            .build();

        assert!(matches!(
            result,
            Err(InvalidRequestError::BodyNotAllowed { method }) if method == "get"
        ));
    }

    #[test]
    fn test_post_without_body_is_valid() {
        // Action endpoints (maintenance start, version upgrade) POST with no body.
        let request = ApiRequest::builder(HttpMethod::Post, "/v2/databases/abc/maintenance")
            .build()
            .unwrap();

        assert!(request.body.is_none());
    }

    #[test]
    fn test_builder_preserves_query_param_order() {
        let request = ApiRequest::builder(HttpMethod::Get, "/v2/databases")
            .query_param("label", "prod")
            .query_param("cursor", "abc123")
            .build()
            .unwrap();

        assert_eq!(
            request.query,
            vec![
                ("label".to_string(), "prod".to_string()),
                ("cursor".to_string(), "abc123".to_string()),
            ]
        );
    }

    #[test]
    fn test_builder_query_pairs_extends() {
        let request = ApiRequest::builder(HttpMethod::Get, "/v2/databases")
            .query_param("label", "prod")
            .query_pairs(vec![("tag", "blue"), ("region", "ewr")])
            .build()
            .unwrap();

        assert_eq!(request.query.len(), 3);
        assert_eq!(request.query[2].0, "region");
    }

    #[test]
    fn test_builder_with_deadline() {
        let request = ApiRequest::builder(HttpMethod::Get, "/v2/databases")
            .deadline(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(request.deadline, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_unserializable_body_is_rejected() {
        use std::collections::HashMap;

        // Maps with non-string keys cannot be represented as JSON objects.
        let bad: HashMap<Vec<u8>, String> = HashMap::from([(vec![1], "x".to_string())]);
        let result = ApiRequest::builder(HttpMethod::Post, "/v2/databases").json(&bad);

        assert!(matches!(
            result,
            Err(InvalidRequestError::UnserializableBody { .. })
        ));
    }
}

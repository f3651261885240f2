//! HTTP dispatch core for Nimbus API communication.
//!
//! This module provides the foundational request/response layer shared by
//! every resource handler: request construction, authentication headers,
//! the transport round trip, rate-limit retries, and envelope decoding.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: the dispatcher issuing authenticated calls
//! - [`Dispatch`]: the narrow trait resource handlers consume
//! - [`ApiRequest`]: a single call, immutable once built
//! - [`RawResponse`]: the transport-level response before decoding
//! - [`RetryPolicy`]: 429-only retry with capped exponential backoff
//! - [`Meta`] / [`Links`] / [`ListOptions`]: the cursor pagination contract
//! - [`ClientError`]: the unified error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use nimbus_api::{ApiKey, ApiRequest, Dispatch, HttpClient, HttpMethod, NimbusConfig};
//!
//! let config = NimbusConfig::builder()
//!     .api_key(ApiKey::new("my-api-key")?)
//!     .build()?;
//! let client = HttpClient::new(config);
//!
//! let request = ApiRequest::builder(HttpMethod::Get, "/v2/databases").build()?;
//! let page: serde_json::Value = client.dispatch(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! Only HTTP 429 responses are retried, up to the configured budget; the
//! wait honors the provider's `Retry-After` hint when present and otherwise
//! doubles from the base delay up to the ceiling. Every other non-2xx
//! status, and every transport failure, is terminal at this layer.

mod envelope;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;

pub use envelope::{decode_json, Links, ListOptions, Meta, MessageEnvelope};
pub use errors::{ApiError, ClientError, DecodeError, InvalidRequestError, RateLimitError};
pub use http_client::{Dispatch, HttpClient, SDK_VERSION};
pub use http_request::{ApiRequest, ApiRequestBuilder, HttpMethod};
pub use http_response::RawResponse;
pub use retry::RetryPolicy;

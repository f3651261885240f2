//! # Nimbus API Rust SDK
//!
//! A Rust SDK for the Nimbus Cloud control-plane API, providing type-safe
//! configuration, authenticated dispatch, rate-limit retries, and cursor
//! pagination for CRUD operations against remote resources.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`NimbusConfig`] and [`NimbusConfigBuilder`]
//! - Validated newtypes for the bearer credential and base URL
//! - An async dispatcher ([`HttpClient`]) with automatic 429 retry and
//!   capped exponential backoff
//! - A uniform envelope codec and cursor pagination model ([`Meta`])
//! - Typed resource handlers built on the narrow [`Dispatch`] seam
//!
//! ## Quick Start
//!
//! ```rust
//! use nimbus_api::{ApiKey, NimbusConfig};
//!
//! // Create configuration using the builder pattern
//! let config = NimbusConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use nimbus_api::resources::DatabaseHandler;
//! use nimbus_api::{ApiKey, HttpClient, ListOptions, NimbusConfig};
//!
//! let config = NimbusConfig::builder()
//!     .api_key(ApiKey::new("your-api-key")?)
//!     .build()?;
//! let client = HttpClient::new(config);
//!
//! let databases = DatabaseHandler::new(&client);
//! let (page, meta) = databases.list(None).await?;
//! ```
//!
//! ## Pagination
//!
//! List endpoints return a page of items plus a [`Meta`] cursor. Traversal
//! is caller-driven: pass [`Meta::next_cursor`] back as the `cursor` option
//! until it returns `None`. The SDK never fetches a whole collection behind
//! a single call.
//!
//! ```rust,ignore
//! let mut options = ListOptions::default();
//! let mut all = Vec::new();
//! loop {
//!     let (page, meta) = databases.list(Some(&options)).await?;
//!     all.extend(page);
//!     match meta.as_ref().and_then(Meta::next_cursor) {
//!         Some(cursor) => options.cursor = Some(cursor.to_string()),
//!         None => break,
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call resolves to a typed value or exactly one [`ClientError`]
//! variant: configuration problems fail at construction; transport failures
//! surface immediately; 429s are retried within a bounded budget and then
//! fail as [`RateLimitError`]; other non-2xx statuses decode into
//! [`ApiError`]; unparseable success bodies are [`DecodeError`]; and an
//! elapsed per-call deadline is a cancellation, even mid-backoff.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`; the client holds no
//!   call-scoped mutable state
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Caller-controlled transport**: inject a shared `reqwest::Client` to
//!   own pooling and concurrency limits

pub mod clients;
pub mod config;
pub mod error;
pub mod resources;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, BaseUrl, NimbusConfig, NimbusConfigBuilder};
pub use error::ConfigError;

// Re-export dispatch core types
pub use clients::{
    decode_json, ApiError, ApiRequest, ApiRequestBuilder, ClientError, DecodeError, Dispatch,
    HttpClient, HttpMethod, InvalidRequestError, Links, ListOptions, MessageEnvelope, Meta,
    RateLimitError, RawResponse, RetryPolicy, SDK_VERSION,
};

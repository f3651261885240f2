//! Error types for client configuration.
//!
//! This module contains error types surfaced while constructing a client.
//! Configuration problems are fatal at construction time and are never
//! retried or deferred to request time.
//!
//! # Example
//!
//! ```rust
//! use nimbus_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant carries a clear, actionable message. Once a
/// [`NimbusConfig`](crate::NimbusConfig) builds successfully, none of these
/// can occur again for the lifetime of the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Nimbus API key.")]
    EmptyApiKey,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.nimbus.cloud').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

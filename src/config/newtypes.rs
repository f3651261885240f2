//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// A validated Nimbus API key.
///
/// This newtype ensures the bearer credential is non-empty and masks its
/// value in debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the credential, displaying only
/// `ApiKey(*****)` instead of the actual key.
///
/// # Example
///
/// ```rust
/// use nimbus_api::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated API base URL.
///
/// The base URL is the scheme + host (+ optional port) every request path is
/// resolved against. Trailing slashes are normalized away so path joining is
/// unambiguous.
///
/// # Example
///
/// ```rust
/// use nimbus_api::BaseUrl;
///
/// let base = BaseUrl::new("https://api.nimbus.cloud").unwrap();
/// assert_eq!(base.as_str(), "https://api.nimbus.cloud");
///
/// let joined = base.join("/v2/databases").unwrap();
/// assert_eq!(joined.as_str(), "https://api.nimbus.cloud/v2/databases");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the value is not an
    /// absolute http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let parsed = Url::parse(raw.trim_end_matches('/'))
            .map_err(|_| ConfigError::InvalidBaseUrl { url: raw.clone() })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl { url: raw });
        }

        Ok(Self(parsed))
    }

    /// Returns the base URL as a string slice, without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    /// Resolves a resource path against the base URL.
    ///
    /// The path is always treated as relative to the base, regardless of a
    /// leading slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the combined value does not
    /// form a valid URL.
    pub fn join(&self, path: &str) -> Result<Url, ConfigError> {
        let combined = format!("{}/{}", self.as_str(), path.trim_start_matches('/'));
        Url::parse(&combined).map_err(|_| ConfigError::InvalidBaseUrl { url: combined })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_accepts_non_empty() {
        let key = ApiKey::new("abc123").unwrap();
        assert_eq!(key.as_ref(), "abc123");
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("super-secret-token").unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "ApiKey(*****)");
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_base_url_accepts_https() {
        let base = BaseUrl::new("https://api.nimbus.cloud").unwrap();
        assert_eq!(base.as_str(), "https://api.nimbus.cloud");
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let base = BaseUrl::new("https://api.nimbus.cloud/").unwrap();
        assert_eq!(base.as_str(), "https://api.nimbus.cloud");
    }

    #[test]
    fn test_base_url_rejects_relative() {
        assert!(matches!(
            BaseUrl::new("api.nimbus.cloud"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_rejects_non_http_scheme() {
        assert!(matches!(
            BaseUrl::new("ftp://api.nimbus.cloud"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_join_normalizes_leading_slash() {
        let base = BaseUrl::new("https://api.nimbus.cloud").unwrap();
        let with_slash = base.join("/v2/databases").unwrap();
        let without_slash = base.join("v2/databases").unwrap();
        assert_eq!(with_slash, without_slash);
        assert_eq!(with_slash.as_str(), "https://api.nimbus.cloud/v2/databases");
    }

    #[test]
    fn test_join_preserves_query() {
        let base = BaseUrl::new("https://api.nimbus.cloud").unwrap();
        let joined = base.join("/v2/databases?label=prod").unwrap();
        assert_eq!(joined.query(), Some("label=prod"));
    }
}

//! Configuration types for the Nimbus API SDK.
//!
//! This module provides the core configuration types used to initialize
//! the SDK for communication with the Nimbus control-plane API.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`NimbusConfig`]: The main configuration struct holding all SDK settings
//! - [`NimbusConfigBuilder`]: A builder for constructing [`NimbusConfig`] instances
//! - [`ApiKey`]: A validated bearer credential with masked debug output
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use nimbus_api::{NimbusConfig, ApiKey};
//!
//! let config = NimbusConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiKey, BaseUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.nimbus.cloud";

/// Default number of additional attempts after a rate-limited first try.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default seed delay for the capped exponential retry backoff.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default ceiling for the retry backoff.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

/// Configuration for the Nimbus API SDK.
///
/// This struct holds all configuration needed for SDK operations: the bearer
/// credential, the API base URL, retry tuning, and the underlying transport.
/// It is read-only after construction.
///
/// # Thread Safety
///
/// `NimbusConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Transport Injection
///
/// By default the client builds its own `reqwest::Client`. Callers that want
/// to control connection pooling, proxies, or timeouts can inject a
/// preconfigured transport via [`NimbusConfigBuilder::transport`]; the SDK
/// never manages pooling itself.
///
/// # Example
///
/// ```rust
/// use nimbus_api::{NimbusConfig, ApiKey, BaseUrl};
///
/// let config = NimbusConfig::builder()
///     .api_key(ApiKey::new("my-api-key").unwrap())
///     .base_url(BaseUrl::new("https://api.staging.nimbus.cloud").unwrap())
///     .max_retries(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_retries(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct NimbusConfig {
    api_key: ApiKey,
    base_url: BaseUrl,
    max_retries: u32,
    retry_base_delay: Duration,
    retry_max_delay: Duration,
    transport: Option<reqwest::Client>,
    user_agent_prefix: Option<String>,
}

impl NimbusConfig {
    /// Creates a new builder for constructing a `NimbusConfig`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nimbus_api::{NimbusConfig, ApiKey};
    ///
    /// let config = NimbusConfig::builder()
    ///     .api_key(ApiKey::new("key").unwrap())
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> NimbusConfigBuilder {
        NimbusConfigBuilder::new()
    }

    /// Returns the bearer credential.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the maximum number of additional attempts after the first.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the seed delay for the retry backoff.
    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    /// Returns the ceiling for the retry backoff.
    #[must_use]
    pub const fn retry_max_delay(&self) -> Duration {
        self.retry_max_delay
    }

    /// Returns the injected transport, if one was configured.
    #[must_use]
    pub const fn transport(&self) -> Option<&reqwest::Client> {
        self.transport.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify NimbusConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NimbusConfig>();
};

/// Builder for constructing [`NimbusConfig`] instances.
///
/// This builder provides a fluent API for configuring the SDK. The only
/// required field is `api_key`; all other fields have sensible defaults.
///
/// # Defaults
///
/// - `base_url`: [`DEFAULT_BASE_URL`]
/// - `max_retries`: [`DEFAULT_MAX_RETRIES`]
/// - `retry_base_delay`: [`DEFAULT_RETRY_BASE_DELAY`]
/// - `retry_max_delay`: [`DEFAULT_RETRY_MAX_DELAY`]
/// - `transport`: `None` (the client builds its own)
/// - `user_agent_prefix`: `None`
///
/// # Example
///
/// ```rust
/// use nimbus_api::{NimbusConfig, ApiKey, BaseUrl};
/// use std::time::Duration;
///
/// let config = NimbusConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .base_url(BaseUrl::new("https://api.nimbus.cloud").unwrap())
///     .max_retries(2)
///     .retry_base_delay(Duration::from_millis(250))
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct NimbusConfigBuilder {
    api_key: Option<ApiKey>,
    base_url: Option<BaseUrl>,
    max_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
    retry_max_delay: Option<Duration>,
    transport: Option<reqwest::Client>,
    user_agent_prefix: Option<String>,
}

impl NimbusConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer credential (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the maximum number of additional attempts after the first.
    ///
    /// `0` disables retries entirely; a rate-limited call then fails on the
    /// first 429.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the seed delay for the capped exponential retry backoff.
    #[must_use]
    pub const fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Sets the ceiling for the retry backoff.
    #[must_use]
    pub const fn retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry_max_delay = Some(delay);
        self
    }

    /// Injects a preconfigured `reqwest::Client` as the transport.
    ///
    /// Use this to share one connection pool across several clients, or to
    /// set proxy/TLS options the SDK does not expose.
    #[must_use]
    pub fn transport(mut self, client: reqwest::Client) -> Self {
        self.transport = Some(client);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`NimbusConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set,
    /// or [`ConfigError::InvalidBaseUrl`] if the default base URL constant
    /// fails to parse (which would be a bug, not a runtime condition).
    pub fn build(self) -> Result<NimbusConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        let base_url = match self.base_url {
            Some(base_url) => base_url,
            None => BaseUrl::new(DEFAULT_BASE_URL)?,
        };

        Ok(NimbusConfig {
            api_key,
            base_url,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_base_delay: self.retry_base_delay.unwrap_or(DEFAULT_RETRY_BASE_DELAY),
            retry_max_delay: self.retry_max_delay.unwrap_or(DEFAULT_RETRY_MAX_DELAY),
            transport: self.transport,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let result = NimbusConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = NimbusConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.max_retries(), DEFAULT_MAX_RETRIES);
        assert_eq!(config.retry_base_delay(), DEFAULT_RETRY_BASE_DELAY);
        assert_eq!(config.retry_max_delay(), DEFAULT_RETRY_MAX_DELAY);
        assert!(config.transport().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NimbusConfig>();
    }

    #[test]
    fn test_config_is_clone_and_debug() {
        let config = NimbusConfig::builder()
            .api_key(ApiKey::new("super-secret-credential").unwrap())
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.max_retries(), config.max_retries());

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("NimbusConfig"));
        // The credential must stay masked through the config's Debug output.
        assert!(!debug_str.contains("super-secret-credential"));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let base = BaseUrl::new("https://api.staging.nimbus.cloud").unwrap();

        let config = NimbusConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .base_url(base.clone())
            .max_retries(1)
            .retry_base_delay(Duration::from_millis(100))
            .retry_max_delay(Duration::from_secs(2))
            .transport(reqwest::Client::new())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url(), &base);
        assert_eq!(config.max_retries(), 1);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(100));
        assert_eq!(config.retry_max_delay(), Duration::from_secs(2));
        assert!(config.transport().is_some());
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_zero_max_retries_is_allowed() {
        let config = NimbusConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .max_retries(0)
            .build()
            .unwrap();

        assert_eq!(config.max_retries(), 0);
    }
}

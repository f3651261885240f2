//! HTTP dispatcher for Nimbus API communication.
//!
//! This module provides the [`HttpClient`] type: the single component that
//! turns an [`ApiRequest`] into a network round trip, classifies the
//! response, retries rate-limited attempts, and hands successful bodies to
//! the envelope codec. Resource handlers depend on it only through the
//! [`Dispatch`] trait.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::Instant;

use crate::clients::envelope::decode_json;
use crate::clients::errors::{ApiError, ClientError, InvalidRequestError, RateLimitError};
use crate::clients::http_request::{ApiRequest, HttpMethod};
use crate::clients::http_response::RawResponse;
use crate::clients::retry::RetryPolicy;
use crate::config::NimbusConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The single capability resource handlers depend on.
///
/// Handlers supply a path, a verb, an optional typed body, and the envelope
/// shape to decode; they do no networking of their own. Keeping the seam
/// this narrow lets tests substitute a fake dispatcher without standing up
/// a server.
#[allow(async_fn_in_trait)]
pub trait Dispatch {
    /// Dispatches `request` and decodes the 2xx body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`]; see the crate-level error taxonomy.
    async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError>;

    /// Dispatches `request` expecting no response payload.
    ///
    /// A 2xx response with an empty body (delete, detach) is a success; any
    /// body that does arrive is ignored rather than decoded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`]; see the crate-level error taxonomy.
    async fn dispatch_empty(&self, request: ApiRequest) -> Result<(), ClientError>;
}

/// HTTP client for making authenticated requests to the Nimbus API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including `Authorization` and `User-Agent`
/// - Automatic retry of rate-limited (429) requests with capped
///   exponential backoff
/// - Classification of responses into the crate's error taxonomy
///
/// It holds no call-scoped mutable state: everything shared is immutable
/// configuration fixed at construction, so one client can serve any number
/// of concurrent calls.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use nimbus_api::{ApiKey, ApiRequest, Dispatch, HttpClient, HttpMethod, NimbusConfig};
///
/// let config = NimbusConfig::builder()
///     .api_key(ApiKey::new("my-api-key")?)
///     .build()?;
/// let client = HttpClient::new(config);
///
/// let request = ApiRequest::builder(HttpMethod::Get, "/v2/databases").build()?;
/// let envelope: serde_json::Value = client.dispatch(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The underlying reqwest transport (injected or owned).
    transport: reqwest::Client,
    /// Immutable client configuration.
    config: NimbusConfig,
    /// Retry policy derived from the configuration.
    retry: RetryPolicy,
    /// Default headers attached to every request.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

/// Wire shape of the provider's error body.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    code: Option<String>,
}

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if no transport was injected and the underlying reqwest client
    /// cannot be created. This should only happen in extremely unusual
    /// circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: NimbusConfig) -> Self {
        let transport = config.transport().cloned().unwrap_or_else(|| {
            reqwest::Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to create HTTP client")
        });

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Nimbus API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", config.api_key().as_ref()),
        );

        let retry = RetryPolicy::from_config(&config);

        Self {
            transport,
            config,
            retry,
            default_headers,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &NimbusConfig {
        &self.config
    }

    /// Returns the default headers attached to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Runs the full request lifecycle and returns the successful raw
    /// response.
    ///
    /// Transport failures surface immediately; only 429 responses loop, and
    /// only within the retry budget. Each backoff sleep races the call's
    /// deadline.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ClientError> {
        request.verify()?;

        let url = self.config.base_url().join(&request.path).map_err(|_| {
            InvalidRequestError::InvalidPath {
                path: request.path.clone(),
            }
        })?;

        tracing::debug!(method = %request.method, path = %request.path, "dispatching request");

        let deadline = request.deadline.map(|d| Instant::now() + d);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let raw = self.round_trip(&request, url.as_str(), deadline).await?;

            if raw.is_success() {
                return Ok(raw);
            }

            if raw.status == 429 {
                if let Some(wait) = self.retry.should_retry(attempt, raw.status, raw.retry_after())
                {
                    tracing::warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "rate limited, backing off before retry"
                    );
                    Self::backoff_sleep(wait, deadline).await?;
                    continue;
                }

                let (message, _) = Self::error_details(&raw);
                return Err(RateLimitError {
                    attempts: attempt,
                    message,
                }
                .into());
            }

            let (message, code) = Self::error_details(&raw);
            return Err(ApiError {
                status: raw.status,
                message,
                code,
            }
            .into());
        }
    }

    /// One transport round trip, bounded by the remaining deadline budget.
    async fn round_trip(
        &self,
        request: &ApiRequest,
        url: &str,
        deadline: Option<Instant>,
    ) -> Result<RawResponse, ClientError> {
        let mut builder = self
            .transport
            .request(reqwest_method(request.method), url);

        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ClientError::Cancelled { phase: "transport" });
            }
            builder = builder.timeout(remaining);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() && deadline.is_some() => {
                return Err(ClientError::Cancelled { phase: "transport" });
            }
            Err(e) => return Err(ClientError::Transport(e)),
        };

        let status = response.status().as_u16();
        let headers = parse_response_headers(response.headers());
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) if e.is_timeout() && deadline.is_some() => {
                return Err(ClientError::Cancelled { phase: "transport" });
            }
            Err(e) => return Err(ClientError::Transport(e)),
        };

        Ok(RawResponse::new(status, headers, body))
    }

    /// Sleeps for `wait`, aborting early with a cancellation error if the
    /// deadline lands inside the sleep.
    async fn backoff_sleep(wait: Duration, deadline: Option<Instant>) -> Result<(), ClientError> {
        if let Some(deadline) = deadline {
            let now = Instant::now();
            if now + wait >= deadline {
                tokio::time::sleep_until(deadline).await;
                return Err(ClientError::Cancelled { phase: "backoff" });
            }
        }
        tokio::time::sleep(wait).await;
        Ok(())
    }

    /// Extracts the provider's message and error code from a failed
    /// response, falling back to the status line when the body is not the
    /// documented error shape.
    fn error_details(raw: &RawResponse) -> (String, Option<String>) {
        if let Ok(body) = serde_json::from_slice::<ApiErrorBody>(&raw.body) {
            if let Some(message) = body.error {
                return (message, body.code);
            }
        }
        (format!("HTTP {}", raw.status), None)
    }
}

impl Dispatch for HttpClient {
    async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let raw = self.execute(request).await?;
        decode_json(&raw.body).map_err(Into::into)
    }

    async fn dispatch_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.execute(request).await.map(|_| ())
    }
}

/// Maps the SDK's method enum onto the transport's.
fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Parses response headers into a `HashMap` keyed by lower-cased name.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

//! Blocking HTTP client.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::transport::HyperTransport;
use crate::{
    ClientConfig, ClientConfigBuilder, GetRequest, LogLevel, Response, Result, TlsPolicy,
    executor, timeout_from_secs_f64,
};

static SHARED: OnceLock<Client> = OnceLock::new();

// ============================================================================
// Public Client
// ============================================================================

/// Blocking GET client with connection pooling, TLS and redirect following.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use snapget::Client;
///
/// let client = Client::builder()
///     .user_agent("my-c-client/1.0")
///     .max_redirects(5)
///     .build()?;
///
/// let response = client.get(
///     "https://example.com/search",
///     &[("q", "a b"), ("q", "c")],
///     &[("Accept", "text/html")],
///     2.5,
/// )?;
/// println!("{} {}", response.status(), response.final_url());
/// # Ok::<(), snapget::Error>(())
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<HyperTransport>,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client with default configuration.
    ///
    /// # Errors
    ///
    /// Fails when the I/O runtime cannot be started.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    ///
    /// # Errors
    ///
    /// Fails when the I/O runtime cannot be started.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HyperTransport::new(&config)?;
        Ok(Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        })
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Process-wide client with default configuration, created on first use.
    ///
    /// # Errors
    ///
    /// Fails when the I/O runtime cannot be started.
    pub fn shared() -> Result<&'static Self> {
        if let Some(client) = SHARED.get() {
            return Ok(client);
        }
        let client = Self::new()?;
        Ok(SHARED.get_or_init(|| client))
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a GET request, blocking until the whole body is buffered.
    ///
    /// Any status code is a successful call; use
    /// [`Response::error_for_status`] to treat non-2xx as an error.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](crate::execute_with).
    pub fn execute(&self, request: &GetRequest) -> Result<Response> {
        executor::execute(self.transport.as_ref(), request, &self.config.user_agent)
    }

    /// Issue a GET to `base_url` with `params` appended to its query.
    ///
    /// Request events are only emitted when logging was enabled with
    /// [`ClientBuilder::with_logging`] or [`ClientBuilder::with_debug_logging`].
    ///
    /// `timeout_seconds` bounds the whole call; zero, negative or NaN means no
    /// timeout, and sub-millisecond values are truncated to whole milliseconds.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](crate::execute_with).
    pub fn get(
        &self,
        base_url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
        timeout_seconds: f64,
    ) -> Result<Response> {
        let mut builder = GetRequest::builder(base_url)
            .query_pairs(params.iter().copied())
            .headers(headers.iter().copied());
        if let Some(timeout) = timeout_from_secs_f64(timeout_seconds) {
            builder = builder.timeout(timeout);
        }
        self.execute(&builder.build())
    }
}

/// Issue a GET on the process-wide [`Client`].
///
/// That client uses [`ClientConfig::default`]: certificates are verified and
/// request logging is off.
///
/// # Example
///
/// ```no_run
/// let response = snapget::get("https://example.com", &[("y", "2")], &[], 0.0)?;
/// assert!(response.is_success());
/// # Ok::<(), snapget::Error>(())
/// ```
///
/// # Errors
///
/// See [`execute_with`](crate::execute_with).
pub fn get(
    base_url: &str,
    params: &[(&str, &str)],
    headers: &[(&str, &str)],
    timeout_seconds: f64,
) -> Result<Response> {
    Client::shared()?.get(base_url, params, headers, timeout_seconds)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Client`].
///
/// # Example
///
/// ```no_run
/// use snapget::Client;
///
/// let client = Client::builder()
///     .danger_accept_invalid_certs(true)
///     .without_logging()
///     .build()?;
/// # Ok::<(), snapget::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
}

impl ClientBuilder {
    /// Set the user agent sent when a request has none.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    /// Set the maximum number of redirects; `0` returns 3xx responses as-is.
    #[must_use]
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config = self.config.max_redirects(max);
        self
    }

    /// Set the certificate verification policy.
    #[must_use]
    pub fn tls(mut self, policy: TlsPolicy) -> Self {
        self.config = self.config.tls(policy);
        self
    }

    /// Accept invalid certificates and host names.
    ///
    /// Only for hosts you trust through other means.
    #[must_use]
    pub fn danger_accept_invalid_certs(self, accept: bool) -> Self {
        let policy = if accept {
            TlsPolicy::DangerAcceptInvalidCerts
        } else {
            TlsPolicy::Verify
        };
        self.tls(policy)
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Log requests at info level.
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.config = self.config.log_level(LogLevel::Info);
        self
    }

    /// Log requests at debug level, including headers.
    #[must_use]
    pub fn with_debug_logging(mut self) -> Self {
        self.config = self.config.log_level(LogLevel::Debug);
        self
    }

    /// Disable request logging (the default).
    #[must_use]
    pub fn without_logging(mut self) -> Self {
        self.config = self.config.log_level(LogLevel::Off);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails when the I/O runtime cannot be started.
    pub fn build(self) -> Result<Client> {
        Client::with_config(self.config.build())
    }
}

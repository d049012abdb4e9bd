//! Client configuration types.

use std::time::Duration;

/// User agent sent when the caller does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("snapget/", env!("CARGO_PKG_VERSION"));

/// Default maximum number of redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// How server certificates are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TlsPolicy {
    /// Verify the certificate chain against the Mozilla roots and the host name.
    #[default]
    Verify,
    /// Accept any certificate for any host. Traffic can be intercepted.
    DangerAcceptInvalidCerts,
}

/// Log level for request logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// No request logging.
    #[default]
    Off,
    /// Log at info level (summary only).
    Info,
    /// Log at debug level (request/response details).
    Debug,
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent added to requests that do not carry one.
    pub user_agent: String,
    /// Maximum number of redirects followed per call.
    pub max_redirects: usize,
    /// Certificate verification policy.
    pub tls: TlsPolicy,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// Request logging level.
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            tls: TlsPolicy::Verify,
            pool_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            log_level: LogLevel::Off,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    user_agent: Option<String>,
    max_redirects: Option<usize>,
    tls: Option<TlsPolicy>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    log_level: Option<LogLevel>,
}

impl ClientConfigBuilder {
    /// Set the default user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of redirects; `0` disables following.
    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Set the certificate verification policy.
    #[must_use]
    pub const fn tls(mut self, policy: TlsPolicy) -> Self {
        self.tls = Some(policy);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the request logging level.
    #[must_use]
    pub const fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            max_redirects: self.max_redirects.unwrap_or(defaults.max_redirects),
            tls: self.tls.unwrap_or(defaults.tls),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            log_level: self.log_level.unwrap_or(defaults.log_level),
        }
    }
}

//! Client configuration.

use std::time::Duration;

/// Default overall timeout for one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = "GatusSDK/1.0";

/// Default cap on a response body as received, before gzip inflation.
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Settings applied once when a `Client` is constructed.
///
/// Every field has a documented default; override only what you need:
///
/// ```
/// use std::time::Duration;
/// use gatus_client::ClientConfig;
///
/// let config = ClientConfig {
///     timeout: Duration::from_secs(10),
///     user_agent: "MyApp/1.0".to_string(),
///     ..ClientConfig::default()
/// };
/// assert_eq!(config.max_idle_connections, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Overall deadline for a single request, connect through body read
    /// (default: 30s). A shorter `CallContext` deadline wins.
    pub timeout: Duration,

    /// Sent as the `User-Agent` header on every request (default: `GatusSDK/1.0`).
    pub user_agent: String,

    /// Idle connections kept in the pool across all hosts (default: 100).
    pub max_idle_connections: usize,

    /// Idle connections kept per host (default: 10).
    pub max_idle_connections_per_host: usize,

    /// How long an idle pooled connection may be reused (default: 90s).
    pub idle_timeout: Duration,

    /// Largest body read off the wire, in bytes (default: 64 MiB). A longer
    /// body fails the call with `TransportError::Io`.
    pub max_response_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_idle_connections: 100,
            max_idle_connections_per_host: 10,
            idle_timeout: Duration::from_secs(90),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

//! The request/response pipeline shared by every status API call.
//!
//! # Design
//! `Client` holds only its base URL, the `User-Agent` value and a shared
//! transport; nothing changes after construction, so one instance can be
//! cloned and used from many threads. Each call runs the same pipeline:
//!
//! 1. `build_request` assembles the URL and standard headers.
//! 2. `execute` checks the caller's `CallContext`, then hands the request to
//!    the transport.
//! 3. `decode` (or `check_status`) classifies the response.
//!
//! Resource-specific methods live in `endpoints` and `suites` and only format
//! a path before running this pipeline.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::http::{self, HeaderValue, Uri};

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::decode::{check_status, decode};
use crate::error::{Result, TransportError};
use crate::fallback::FirstAttempt;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::UptimeData;

/// Blocking client for the status service's HTTP API.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    user_agent: String,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client with default configuration and the `ureq` transport.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: &str, config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(base_url, config, transport)
    }

    /// Client that sends every request through `transport`.
    ///
    /// `config.timeout` and the pool settings only apply to the default
    /// transport; a custom transport enforces its own limits.
    pub fn with_transport(base_url: &str, config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent,
            transport: Arc::new(transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (already percent-escaped, may carry a query
    /// string) with the standard headers and, if given, a bearer token.
    pub fn build_request(&self, method: HttpMethod, path: &str, token: Option<&str>) -> Result<HttpRequest> {
        let url = format!("{}{path}", self.base_url);
        Uri::try_from(url.as_str()).map_err(http::Error::from)?;

        let mut headers = vec![
            ("user-agent".to_string(), self.user_agent.clone()),
            ("accept".to_string(), "application/json".to_string()),
            ("accept-encoding".to_string(), "gzip".to_string()),
        ];
        if let Some(token) = token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        for (_, value) in &headers {
            HeaderValue::from_str(value).map_err(http::Error::from)?;
        }

        Ok(HttpRequest { method, url, headers })
    }

    /// Send `request` through the transport, honouring `ctx`.
    ///
    /// A cancelled or expired context fails before anything is sent; a
    /// response that arrives after cancellation is discarded.
    pub fn execute(&self, ctx: &CallContext, request: &HttpRequest) -> Result<HttpResponse> {
        ctx.check()?;
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.execute(request, ctx)?;
        if ctx.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        debug!(status = response.status, gzip = response.is_gzip(), "received response");
        Ok(response)
    }

    /// Build, send and decode one request into `T`.
    pub fn request<T>(&self, ctx: &CallContext, method: HttpMethod, path: &str, token: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.build_request(method, path, token)?;
        let response = self.execute(ctx, &request)?;
        decode(response)
    }

    /// Build and send one request, accepting any 2xx answer regardless of body.
    pub(crate) fn send(&self, ctx: &CallContext, method: HttpMethod, path: &str, token: Option<&str>) -> Result<()> {
        let request = self.build_request(method, path, token)?;
        let response = self.execute(ctx, &request)?;
        check_status(response)
    }

    /// GET `path` as `UptimeData`, falling back to a bare-number answer.
    ///
    /// The second request is only sent after the first response has been
    /// consumed. A first-attempt API error takes precedence over whatever the
    /// second attempt reports.
    pub fn request_uptime(&self, ctx: &CallContext, path: &str, duration: &str) -> Result<UptimeData> {
        let fallback = match FirstAttempt::classify(self.request(ctx, HttpMethod::Get, path, None)) {
            FirstAttempt::Done(data) => return Ok(data),
            FirstAttempt::Abort(err) => return Err(err),
            FirstAttempt::Retry(fallback) => fallback,
        };
        debug!(error = %fallback.first_error(), "structured uptime decode failed, retrying as a number");

        let second = self.request::<f64>(ctx, HttpMethod::Get, path, None);
        fallback.resolve(second, duration)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn client() -> Client {
        Client::new("https://status.example.org")
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(Client::new("https://status.example.org/").base_url(), "https://status.example.org");
        assert_eq!(Client::new("https://status.example.org//").base_url(), "https://status.example.org");
    }

    #[test]
    fn build_request_sets_standard_headers() {
        let req = client()
            .build_request(HttpMethod::Get, "/api/v1/endpoints/statuses", None)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://status.example.org/api/v1/endpoints/statuses");
        assert_eq!(req.header("User-Agent"), Some("GatusSDK/1.0"));
        assert_eq!(req.header("Accept"), Some("application/json"));
        assert_eq!(req.header("Accept-Encoding"), Some("gzip"));
        assert_eq!(req.header("Authorization"), None);
    }

    #[test]
    fn build_request_with_token_adds_bearer_header() {
        let req = client()
            .build_request(HttpMethod::Post, "/api/v1/endpoints/core_ext/external?success=true", Some("potato"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("authorization"), Some("Bearer potato"));
    }

    #[test]
    fn custom_user_agent() {
        let config = ClientConfig {
            user_agent: "MyApp/1.0".to_string(),
            ..ClientConfig::default()
        };
        let req = Client::with_config("https://status.example.org", config)
            .build_request(HttpMethod::Get, "/", None)
            .unwrap();
        assert_eq!(req.header("user-agent"), Some("MyApp/1.0"));
    }

    #[test]
    fn illegal_url_is_invalid_request() {
        let err = client().build_request(HttpMethod::Get, "/bad path", None).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn illegal_header_value_is_invalid_request() {
        let err = client()
            .build_request(HttpMethod::Post, "/x", Some("tok\nen"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}

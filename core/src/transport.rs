//! Pluggable transport that performs the actual HTTP exchange.
//!
//! # Design
//! The client never talks to the network directly. It hands a fully built
//! [`HttpRequest`] to a [`Transport`] and gets back a buffered
//! [`HttpResponse`] or a [`TransportError`]. Non-2xx statuses are data, not
//! errors, at this layer; status interpretation belongs to the decoder.
//!
//! [`UreqTransport`] is the default: a blocking `ureq::Agent` whose
//! connection pool is shared by every clone of the client. The exchange runs
//! on a worker thread while the calling thread watches the `CallContext`, so
//! `cancel()` or an elapsed deadline releases the caller without waiting for
//! the socket. An abandoned worker finishes against its own timeout.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// How often a waiting caller re-checks its `CallContext`.
const CANCEL_POLL: Duration = Duration::from_millis(20);

/// Executes one request/response exchange.
///
/// Implementations must be safe to call from many threads at once and must
/// report every failure to complete the exchange as a `TransportError`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest, ctx: &CallContext) -> Result<HttpResponse, TransportError>;
}

/// Blocking, connection-pooled transport backed by `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    timeout: Duration,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .max_idle_connections(config.max_idle_connections)
            .max_idle_connections_per_host(config.max_idle_connections_per_host)
            .max_idle_age(config.idle_timeout)
            .build()
            .new_agent();
        Self {
            agent,
            timeout: config.timeout,
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Per-request timeout: the configured timeout, shortened to the call's deadline.
    fn timeout_for(&self, ctx: &CallContext) -> Duration {
        match ctx.remaining() {
            Some(left) => left.min(self.timeout),
            None => self.timeout,
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest, ctx: &CallContext) -> Result<HttpResponse, TransportError> {
        let (tx, rx) = mpsc::channel();
        let agent = self.agent.clone();
        let owned = request.clone();
        let timeout = self.timeout_for(ctx);
        let limit = self.max_response_bytes;
        thread::Builder::new()
            .name("gatus-client-exchange".to_string())
            .spawn(move || {
                // The receiver is gone if the caller gave up; nothing to report then.
                let _ = tx.send(exchange(&agent, &owned, timeout, limit));
            })
            .map_err(|err| TransportError::Io(Box::new(err)))?;

        loop {
            match rx.recv_timeout(CANCEL_POLL) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => {
                    if ctx.is_cancelled() {
                        return Err(TransportError::Cancelled);
                    }
                    if ctx.remaining().is_some_and(|left| left.is_zero()) {
                        return Err(TransportError::DeadlineExceeded);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TransportError::Io("exchange worker exited without a result".into()));
                }
            }
        }
    }
}

fn exchange(agent: &Agent, request: &HttpRequest, timeout: Duration, limit: u64) -> Result<HttpResponse, TransportError> {
    let result = match request.method {
        HttpMethod::Get => prepare(agent.get(&request.url), request, timeout).call(),
        HttpMethod::Post => prepare(agent.post(&request.url), request, timeout).send_empty(),
    };
    let mut response = result?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.body_mut().with_config().limit(limit).read_to_vec()?;

    Ok(HttpResponse { status, headers, body })
}

fn prepare<B>(mut builder: RequestBuilder<B>, request: &HttpRequest, timeout: Duration) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.config().timeout_global(Some(timeout)).build()
}

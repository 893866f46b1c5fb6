//! Blocking client for a Gatus-style status service's HTTP API.
//!
//! # Overview
//! Fetches endpoint and suite statuses, uptime and response-time statistics,
//! pushes results for external endpoints, and builds badge URLs. Every call
//! runs through one pipeline: build the request, execute it on a pluggable
//! [`Transport`], then decode the (optionally gzip-compressed) JSON body.
//!
//! # Design
//! - `Client` is immutable after construction and safe to share between threads.
//! - Failures are one closed [`Error`] enum: validation, invalid request,
//!   transport, API (non-2xx) and decode.
//! - Every network-issuing call takes a [`CallContext`] for cancellation and
//!   deadlines.
//! - The uptime endpoint accepts either a structured object or a bare number
//!   from the service; see [`Client::request_uptime`].
//!
//! ```no_run
//! use gatus_client::{normalize_key, CallContext, Client};
//!
//! let client = Client::new("https://status.example.org");
//! let ctx = CallContext::background();
//! let key = normalize_key("core", "blog-home");
//! let uptime = client.endpoint_uptime(&ctx, &key, "24h")?;
//! println!("uptime: {:.2}%", uptime * 100.0);
//! # Ok::<(), gatus_client::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod decode;
pub mod endpoints;
pub mod error;
mod fallback;
pub mod http;
pub mod key;
pub mod period;
pub mod suites;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use context::CallContext;
pub use error::{ApiError, DecodeError, Error, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use key::normalize_key;
pub use period::Period;
pub use transport::{Transport, UreqTransport};
pub use types::{
    ConditionResult, EndpointResult, EndpointStatus, ResponseTimeData, SuiteResult, SuiteStatus, UptimeData,
};

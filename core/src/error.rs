//! Error types for the status API client.
//!
//! # Design
//! Every failure the client can report is a variant of the closed [`Error`]
//! enum, so callers pattern-match instead of probing concrete types. The four
//! runtime kinds are kept apart on purpose:
//!
//! - `Validation`: the caller's arguments were rejected before any I/O.
//! - `Transport`: the exchange never completed (DNS, connect, TLS, timeout,
//!   cancellation).
//! - `Api`: the server answered with a non-2xx status.
//! - `Decode`: the status was fine but the payload could not be interpreted.
//!
//! `InvalidRequest` covers URLs or header values that cannot be placed on a
//! request line at all.

use std::io;

use thiserror::Error;
use ureq::http;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument is structurally invalid. No request was sent.
    #[error("validation error: field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// The request could not be constructed (illegal URL or header value).
    #[error("creating request: {0}")]
    InvalidRequest(#[from] http::Error),

    /// The exchange with the server did not complete.
    #[error("executing request: {0}")]
    Transport(#[from] TransportError),

    /// The server completed the exchange with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The payload of a successful response could not be interpreted.
    #[error("decoding response: {0}")]
    Decode(#[from] DecodeError),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// HTTP status of an `Api` error, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

/// A non-2xx answer from the status service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// Canonical reason phrase for `status`; empty for unregistered codes.
    pub reason: String,
    /// Raw (decompressed) response body, possibly empty.
    pub body: String,
}

impl ApiError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default();
        Self {
            status,
            reason: reason.to_string(),
            body: body.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error: status {}: {}", self.status, self.reason)?;
        if !self.body.is_empty() {
            write!(f, " (body: {})", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// The request/response exchange could not be completed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Name resolution, connection, TLS, timeout or body-read failure.
    #[error("{0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => TransportError::DeadlineExceeded,
            other => TransportError::Io(Box::new(other)),
        }
    }
}

/// A successful response whose payload could not be interpreted.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body claimed `Content-Encoding: gzip` but is not a valid gzip stream.
    #[error("reading gzip body: {0}")]
    Gzip(#[source] io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

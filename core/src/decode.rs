//! Response decoding: content encoding, status classification, JSON.
//!
//! # Design
//! `decode` consumes the `HttpResponse`, so the body buffer is released on
//! every exit path. The order of checks matters:
//!
//! 1. `204 No Content` succeeds with `T::default()` without touching the body.
//! 2. A gzip-encoded body is inflated; a broken stream is a `DecodeError`,
//!    never a JSON error.
//! 3. Any other non-2xx status becomes an `ApiError` carrying the inflated body.
//!    A stream that breaks after a valid gzip header still yields the
//!    `ApiError`, with whatever inflated before the break.
//! 4. A 2xx body holding no JSON value at all (empty or whitespace) is the
//!    end-of-input case and yields `T::default()`; anything else must parse.

use std::io::Read;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ApiError, DecodeError, Error};
use crate::http::HttpResponse;

const NO_CONTENT: u16 = 204;

/// Decode a response into `T`, classifying failures as API or decode errors.
pub fn decode<T>(response: HttpResponse) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    let Some(body) = success_body(response)? else {
        return Ok(T::default());
    };

    let mut values = serde_json::Deserializer::from_slice(&body).into_iter::<T>();
    match values.next() {
        None => Ok(T::default()),
        Some(value) => value.map_err(|err| DecodeError::Json(err).into()),
    }
}

/// Accept any 2xx response without interpreting its body.
pub fn check_status(response: HttpResponse) -> Result<(), Error> {
    success_body(response).map(|_| ())
}

/// The inflated body of a 2xx response; `None` for `204 No Content`.
fn success_body(response: HttpResponse) -> Result<Option<Vec<u8>>, Error> {
    if response.status == NO_CONTENT {
        return Ok(None);
    }

    let status = response.status;
    let success = (200..300).contains(&status);
    let body = if response.is_gzip() {
        gunzip(&response.body, !success)?
    } else {
        response.body
    };

    if !success {
        warn!(status, "status service returned an error");
        return Err(ApiError::new(status, String::from_utf8_lossy(&body)).into());
    }
    Ok(Some(body))
}

/// Inflate a gzip body.
///
/// With `keep_partial`, a stream that fails after its header was read
/// returns the bytes inflated so far; an unreadable header is always an error.
fn gunzip(body: &[u8], keep_partial: bool) -> Result<Vec<u8>, DecodeError> {
    // Empty input is an empty body, not a missing gzip header.
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let mut inflated = Vec::new();
    let mut decoder = GzDecoder::new(body);
    match decoder.read_to_end(&mut inflated) {
        Ok(_) => Ok(inflated),
        Err(_) if keep_partial && decoder.header().is_some() => Ok(inflated),
        Err(err) => Err(DecodeError::Gzip(err)),
    }
}

//! Structured-then-scalar decoding for the uptime endpoint.
//!
//! # Design
//! Depending on its version, the status service answers
//! `/uptimes/{duration}` with either an `UptimeData` object or a bare number.
//! The client tries the object first and, if the exchange completed but did
//! not yield one, re-issues the request and reads a number instead.
//!
//! The precedence between the two failures is kept out of the I/O path so it
//! can be tested on its own:
//!
//! - [`FirstAttempt::classify`] sorts the structured attempt into done,
//!   abort (the request never executed) or retry.
//! - [`Fallback::resolve`] combines the retained first error with the scalar
//!   attempt. A first-attempt `Api` error always wins over the second
//!   failure, so a 401 or 404 is never reported as "could not parse a number".

use tracing::warn;

use crate::error::Error;
use crate::types::UptimeData;

/// Outcome of the structured attempt.
#[derive(Debug)]
pub(crate) enum FirstAttempt {
    Done(UptimeData),
    /// The exchange did not happen; no second attempt is made.
    Abort(Error),
    /// The exchange happened but did not produce an `UptimeData`.
    Retry(Fallback),
}

impl FirstAttempt {
    pub(crate) fn classify(result: Result<UptimeData, Error>) -> Self {
        match result {
            Ok(data) => FirstAttempt::Done(data),
            Err(err @ (Error::Transport(_) | Error::InvalidRequest(_) | Error::Validation { .. })) => {
                FirstAttempt::Abort(err)
            }
            Err(err) => FirstAttempt::Retry(Fallback { first: err }),
        }
    }
}

/// State carried between the two attempts: the first attempt's error.
#[derive(Debug)]
pub(crate) struct Fallback {
    first: Error,
}

impl Fallback {
    pub(crate) fn first_error(&self) -> &Error {
        &self.first
    }

    /// Combine the scalar attempt with the retained first error.
    pub(crate) fn resolve(self, second: Result<f64, Error>, duration: &str) -> Result<UptimeData, Error> {
        match second {
            Ok(uptime) => {
                warn!(duration, "uptime endpoint answered with a bare number");
                Ok(UptimeData {
                    uptime,
                    duration: duration.to_string(),
                    timestamp: None,
                })
            }
            Err(_) if self.first.is_api() => Err(self.first),
            Err(second) => Err(second),
        }
    }
}

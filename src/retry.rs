//! Bounded fixed-interval retry for flaky UI interactions.
//!
//! Every interactive step against the remote page goes through
//! [`RetryPolicy::attempt`]: transient failures (staleness, interception,
//! wait timeouts) are retried after a fixed pause, anything else propagates
//! immediately. No backoff growth; the attempt ceiling is the contract.

use crate::error::DriverError;
use log::debug;
use std::{thread, time::Duration};
use thiserror::Error;

/// Retry ceiling and pause applied to one interactive step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

/// Why a retried step did not produce a value
#[derive(Debug, Error)]
pub enum RetryError {
    /// Every try failed with a transient error; carries the last one
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: DriverError },

    /// A non-transient error surfaced and was not retried
    #[error("non-retryable failure on attempt {attempts}: {source}")]
    Fatal {
        attempts: u32,
        #[source]
        source: DriverError,
    },
}

impl RetryError {
    /// Attempts consumed before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Fatal { attempts, .. } => *attempts,
        }
    }

    /// The driver error that ended the step
    pub fn into_error(self) -> DriverError {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Fatal { source, .. } => source,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Run `action` until it succeeds, a non-transient error surfaces, or the
    /// attempt ceiling is reached. Success carries the number of attempts
    /// consumed.
    pub fn attempt<T, F>(&self, what: &str, mut action: F) -> Result<(T, u32), RetryError>
    where
        F: FnMut() -> Result<T, DriverError>,
    {
        let ceiling = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match action() {
                Ok(value) => return Ok((value, attempt)),
                Err(err) if err.is_transient() => {
                    if attempt >= ceiling {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    debug!("{what}: attempt {attempt}/{ceiling} failed: {err}");
                    thread::sleep(self.interval);
                }
                Err(err) => {
                    return Err(RetryError::Fatal {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }
}

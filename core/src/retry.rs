//! Immediate retries of transient failures.
//!
//! Retries happen back to back with no delay. Only
//! [`ErrorKind::is_transient`](crate::error::ErrorKind::is_transient) errors
//! are retried; any other outcome ends the loop on the spot.

use crate::error::Result;

/// Run `attempt` up to `retries + 1` times and return the last outcome.
pub fn with_retries<T>(retries: u32, mut attempt: impl FnMut(u32) -> Result<T>) -> Result<T> {
    let mut number = 0;
    loop {
        match attempt(number) {
            Err(err) if err.is_retryable() && number < retries => {
                tracing::debug!(
                    attempt = number + 1,
                    retries,
                    kind = %err.kind(),
                    "transient failure, retrying"
                );
                number += 1;
            }
            Err(err) => {
                if err.is_retryable() && retries > 0 {
                    tracing::warn!(attempts = u64::from(number) + 1, kind = %err.kind(), "retries exhausted");
                }
                return Err(err);
            }
            Ok(value) => return Ok(value),
        }
    }
}

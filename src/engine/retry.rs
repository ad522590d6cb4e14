//! Bounded retry for idempotent store calls.

use tracing::warn;

use crate::error::EngineResult;

/// Attempts made before a transient failure is surfaced.
pub const MAX_ATTEMPTS: u32 = 3;

/// Runs `op` until it succeeds, fails permanently, or [`MAX_ATTEMPTS`]
/// transient failures have occurred.
///
/// Only pass operations that are safe to repeat.
pub fn retry_idempotent<T, F>(operation: &str, mut op: F) -> EngineResult<T>
where
    F: FnMut() -> EngineResult<T>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Err(error) if error.is_transient() && attempt < MAX_ATTEMPTS => {
                warn!(operation, attempt, error = %error, "Transient storage failure, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

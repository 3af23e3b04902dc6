//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the outbound call (connect + send + full body read) by a deadline
//! - Cancel the in-flight call cleanly when the deadline passes
//!
//! Timed-out forwards surface as `ForwardError::Timeout` (504 Gateway Timeout).

use std::future::Future;
use std::time::Duration;

use crate::proxy::error::ForwardError;

/// Run `operation` under `deadline`. The operation future is dropped, and
/// with it any open upstream connection, when the deadline elapses.
pub async fn with_deadline<F, T>(deadline: Duration, operation: F) -> Result<T, ForwardError>
where
    F: Future<Output = Result<T, ForwardError>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(ForwardError::Timeout(deadline)),
    }
}

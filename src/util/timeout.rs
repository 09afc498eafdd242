//! Bounded waits on transport calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{RefreshError, Result};

/// Fail with [`RefreshError::Timeout`] if `future` has not settled within `duration`.
///
/// Custom [`HttpTransport`](crate::auth::HttpTransport)s get the same bound as
/// the reqwest client without having to enforce one themselves.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(duration, future).await.map_err(|_| {
        tracing::debug!(timeout_ms = timeout_millis(duration), "token call exceeded its bound");
        RefreshError::Timeout(timeout_millis(duration))
    })?
}

/// `duration` in whole milliseconds, saturating at `u64::MAX`.
pub fn timeout_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

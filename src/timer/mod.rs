//! Async timing primitives on top of tokio's timers.
//!
//! * [`sleep`] suspends the current task.
//! * [`timeout`] races an operation against a deadline and reports expiry
//!   as [`TimeError::Timeout`].
//! * [`interval`] holds the repeat-until-stopped loops.
//! * [`signal`] holds the shared flag and running counter that loops use
//!   to coordinate shutdown.
//!
//! # Cancellation
//!
//! When [`timeout`] loses the race the operation future is dropped, which
//! cancels it at its next `.await`. Work the operation spawned onto the
//! runtime is not owned by that future; [`timeout_with_cancel`] hands such
//! operations a [`CancellationToken`] that fires at the deadline.
//! [`timeout_detached`] keeps the operation running in the background after
//! the deadline and only discards its result.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, TimeError};

pub mod interval;
pub mod signal;

pub use interval::{poll_until, spawn_interval, IntervalCommand, IntervalHandle};
pub use signal::{RunningGuard, Signal, SignalState};

/// Suspend the calling task for at least `duration`.
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

pub async fn sleep_ms(millis: u64) {
    sleep(Duration::from_millis(millis)).await;
}

/// Run `operation` with a deadline.
///
/// Returns the operation's value if it finishes first, its error wrapped in
/// [`TimeError::Operation`] if it fails first, and [`TimeError::Timeout`]
/// if the deadline elapses first.
pub async fn timeout<F, T>(deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result.map_err(TimeError::Operation),
        Err(_) => Err(TimeError::Timeout { after: deadline }),
    }
}

/// Like [`timeout`], but the operation receives a token that is cancelled
/// when the deadline elapses.
pub async fn timeout_with_cancel<F, Fut, T>(deadline: Duration, operation: F) -> Result<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let token = CancellationToken::new();
    let result = timeout(deadline, operation(token.clone())).await;
    if result.as_ref().is_err_and(TimeError::is_timeout) {
        token.cancel();
    }
    result
}

/// Like [`timeout`], but the operation runs as its own task and is left
/// running when the deadline elapses. Its eventual result is discarded.
pub async fn timeout_detached<F, T>(deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let mut handle = tokio::spawn(operation);
    match tokio::time::timeout(deadline, &mut handle).await {
        Ok(joined) => joined?.map_err(TimeError::Operation),
        Err(_) => {
            log::warn!("Deadline of {}ms elapsed, leaving operation running", deadline.as_millis());
            Err(TimeError::Timeout { after: deadline })
        }
    }
}

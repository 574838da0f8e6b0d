//! Cooperative cancellation.
//!
//! A single [`CancellationToken`] flows from the caller through the resolver
//! into whichever provider is active. Providers wrap their network calls in
//! [`cancellable`]; when the token fires, the wrapped future is dropped
//! (aborting the underlying request) and [`Cancelled`] is returned instead of
//! a partial result.

use std::future::Future;

use thiserror::Error;

pub use tokio_util::sync::CancellationToken;

/// Marker error returned when a [`CancellationToken`] fires before the wrapped
/// future completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Runs `future` to completion unless `token` is cancelled first.
///
/// A token that is already cancelled short-circuits without polling the
/// future at all. Cancellation wins ties: if both are ready in the same poll,
/// the result is `Err(Cancelled)`.
///
/// # Examples
///
/// ```rust
/// use core_async::cancel::{cancellable, CancellationToken, Cancelled};
///
/// # async fn example() {
/// let token = CancellationToken::new();
/// token.cancel();
///
/// let outcome = cancellable(&token, async { 1 }).await;
/// assert_eq!(outcome, Err(Cancelled));
/// # }
/// ```
pub async fn cancellable<F>(token: &CancellationToken, future: F) -> Result<F::Output, Cancelled>
where
    F: Future,
{
    if token.is_cancelled() {
        return Err(Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        output = future => Ok(output),
    }
}

/// Returns `Err(Cancelled)` if `token` has fired.
///
/// Used at checkpoints between CPU-only stages (fetch, parse, validate) so
/// that no stage runs on behalf of a caller that already gave up.
pub fn ensure_active(token: &CancellationToken) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}

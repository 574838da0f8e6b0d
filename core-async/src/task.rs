//! Task spawning.
//!
//! Resolution itself never spawns: providers run on the caller's task so that
//! dropping the resolution future aborts in-flight requests. Spawning is only
//! needed by hosts and tests that drive cancellation from a second task.

pub use tokio::task::JoinHandle;

/// Spawns a new asynchronous task on the Tokio runtime.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # async fn example() {
/// let handle = spawn(async { 42 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # }
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

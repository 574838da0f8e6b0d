//! Async runtime seam for the metadata resolution engine.
//!
//! Every other crate in the workspace reaches the runtime through this crate
//! instead of depending on Tokio directly. That keeps the suspension points of
//! the engine (network calls) and its cancellation plumbing in one place.
//!
//! # Modules
//!
//! - `task`: Task spawning
//! - `time`: Sleep, timeout and duration types
//! - `cancel`: Cooperative cancellation (`CancellationToken`, [`cancel::cancellable`])
//!
//! # Examples
//!
//! ```rust
//! use core_async::cancel::{cancellable, CancellationToken};
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let token = CancellationToken::new();
//!     let outcome = cancellable(&token, async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     })
//!     .await;
//!     assert_eq!(outcome, Ok(42));
//! }
//! ```

pub mod cancel;
pub mod task;
pub mod time;

pub use cancel::{cancellable, CancellationToken, Cancelled};
pub use task::spawn;
pub use time::{sleep, timeout, Duration};

//! Time-related abstractions.
//!
//! Providers bound each request with `HttpRequest::timeout`, which the HTTP
//! bridge enforces. [`sleep`] drives retry backoff in the desktop HTTP bridge
//! and [`timeout`] bounds a whole resolution for hosts that want a deadline.

pub use tokio::time::{sleep, timeout};

pub use std::time::Duration;

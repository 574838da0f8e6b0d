//! # Desktop Bridge Implementations
//!
//! Default implementation of the bridge transport for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` (connection pooling, rustls, per-request
//!   timeouts, retry with exponential backoff on 5xx/429)
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HttpClientConfig, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::with_config(HttpClientConfig::default())?);
//! // Inject into ResolverConfig / provider adapters
//! ```

mod http;

pub use http::{HttpClientConfig, ReqwestHttpClient};

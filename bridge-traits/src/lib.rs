//! # Host Bridge Traits
//!
//! Transport abstraction consumed by the metadata resolution engine.
//!
//! ## Overview
//!
//! Provider adapters never talk to an HTTP library directly. They build an
//! [`HttpRequest`], hand it to an [`HttpClient`], and interpret the
//! [`HttpResponse`]. The desktop implementation lives in `bridge-desktop`
//! (reqwest); tests substitute a `mockall` double.
//!
//! ## Error Handling
//!
//! All bridge operations return [`BridgeError`](error::BridgeError). Provider
//! adapters treat every `BridgeError` as a transient transport failure and
//! degrade it to "no result"; it never reaches the resolver's caller.
//!
//! ## Thread Safety
//!
//! `HttpClient` requires `Send + Sync` so that one client can be shared by
//! several adapters (and by concurrent fan-out resolution) behind an `Arc`.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};

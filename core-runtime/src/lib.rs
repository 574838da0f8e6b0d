//! # Core Runtime Module
//!
//! Runtime infrastructure for the metadata resolution engine:
//! - Resolver configuration (provider order, API keys, endpoints, timeouts)
//! - Logging and tracing setup
//!
//! ## Overview
//!
//! `core-metadata` consumes a [`config::ResolverConfig`] to build its provider
//! registry. With the `desktop-shims` feature the config supplies a
//! reqwest-backed `HttpClient` when the host does not inject one.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ProviderEndpoints, ResolverConfig, ResolverConfigBuilder};
pub use error::{Error, Result};

//! # Metadata Resolution Engine
//!
//! Resolves derived song content (lyrics text, composer lists) from
//! third-party services that share no protocol.
//!
//! ## Overview
//!
//! - [`query`]: the caller's song identity
//! - [`normalize`]: provider-specific query forms (slugs, search strings)
//! - [`providers`]: SOAP, REST and scrape adapters behind one trait
//! - [`html`]: allowlist-based DOM-to-text extraction for scraped pages
//! - [`matcher`]: validates a provider's claimed artist/title against the query
//! - [`resolver`]: sequential and fan-out orchestration with cancellation
//! - [`registry`] and [`service`]: configuration-driven wiring
//!
//! Provider features: `lyrics` (ChartLyrics, Happi, lyrics.ovh, AZLyrics,
//! Genius) and `composers` (works registry). Both are on by default.

pub mod error;
pub mod html;
pub mod matcher;
pub mod normalize;
pub mod providers;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod service;

pub use error::{MetadataError, Result};
pub use matcher::{is_match, MatchDecision};
pub use providers::{
    ClaimedIdentity, ContentKind, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult,
};
pub use query::SongQuery;
pub use registry::ProviderRegistry;
pub use resolver::{AttemptRecord, AttemptStatus, Resolution, Resolver};
pub use service::{MetadataResolutionService, ResolutionMode};

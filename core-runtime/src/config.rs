//! # Resolver Configuration
//!
//! Provides configuration for the metadata resolution engine.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`ResolverConfig`] holding the HTTP transport, provider ordering, API keys,
//! endpoints and timeouts. Validation is fail-fast: `build()` rejects
//! malformed endpoints, zero timeouts and a missing transport.
//!
//! ## Provider ordering
//!
//! Provider order is configuration, never hard-coded in the resolver. When no
//! order is given, [`DEFAULT_LYRICS_PROVIDERS`] is used: structured APIs first,
//! scrape-based fallbacks last. Keyed providers (currently `happi`) are left
//! out of the default order when no API key is configured.
//!
//! ## Usage
//!
//! ### With desktop defaults
//!
//! ```ignore
//! use core_runtime::config::ResolverConfig;
//!
//! let config = ResolverConfig::builder()
//!     .lyrics_providers(["chartlyrics", "azlyrics"])
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### From the environment
//!
//! ```ignore
//! // SONGMETA_LYRICS_PROVIDERS=happi,genius SONGMETA_HAPPI_API_KEY=...
//! let config = core_runtime::config::ResolverConfig::from_env()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Default lyrics provider order.
pub const DEFAULT_LYRICS_PROVIDERS: &[&str] =
    &["happi", "chartlyrics", "lyricsovh", "azlyrics", "genius"];

/// Default composer provider order.
pub const DEFAULT_COMPOSER_PROVIDERS: &[&str] = &["worksregistry"];

/// Providers that cannot be queried without an API key.
const KEYED_PROVIDERS: &[&str] = &["happi"];

/// Default timeout applied to every outbound provider call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default depth guard for HTML extraction.
pub const DEFAULT_MAX_HTML_DEPTH: usize = 64;

/// Environment variable names read by [`ResolverConfig::from_env`].
pub mod env_keys {
    pub const LYRICS_PROVIDERS: &str = "SONGMETA_LYRICS_PROVIDERS";
    pub const COMPOSER_PROVIDERS: &str = "SONGMETA_COMPOSER_PROVIDERS";
    pub const HAPPI_API_KEY: &str = "SONGMETA_HAPPI_API_KEY";
    pub const WORKS_REGISTRY_URL: &str = "SONGMETA_WORKS_REGISTRY_URL";
    pub const REQUEST_TIMEOUT_SECS: &str = "SONGMETA_REQUEST_TIMEOUT_SECS";
    pub const USER_AGENT: &str = "SONGMETA_USER_AGENT";
}

/// Base URLs for every provider.
///
/// Overridable so tests and self-hosted mirrors can redirect traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub chartlyrics: String,
    pub happi: String,
    pub lyricsovh: String,
    pub azlyrics: String,
    pub genius: String,
    /// No public default exists; the works provider is disabled until set.
    pub works_registry: Option<String>,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            chartlyrics: "http://api.chartlyrics.com".to_string(),
            happi: "https://api.happi.dev".to_string(),
            lyricsovh: "https://api.lyrics.ovh".to_string(),
            azlyrics: "https://www.azlyrics.com".to_string(),
            genius: "https://genius.com".to_string(),
            works_registry: None,
        }
    }
}

impl ProviderEndpoints {
    fn all(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("chartlyrics", Some(self.chartlyrics.as_str())),
            ("happi", Some(self.happi.as_str())),
            ("lyricsovh", Some(self.lyricsovh.as_str())),
            ("azlyrics", Some(self.azlyrics.as_str())),
            ("genius", Some(self.genius.as_str())),
            ("worksregistry", self.works_registry.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| url.map(|url| (name, url)))
    }
}

/// Configuration for the metadata resolution engine.
///
/// Use [`ResolverConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Transport shared by every provider adapter
    pub http_client: Arc<dyn HttpClient>,

    /// Lyrics provider keys in resolution order
    pub lyrics_providers: Vec<String>,

    /// Composer provider keys in resolution order
    pub composer_providers: Vec<String>,

    /// API key for the Happi lyrics API
    pub happi_api_key: Option<String>,

    /// Provider base URLs
    pub endpoints: ProviderEndpoints,

    /// Timeout applied to each outbound provider call
    pub request_timeout: Duration,

    /// User-Agent for the default desktop transport
    pub user_agent: String,

    /// Maximum element depth visited by HTML extraction
    pub max_html_depth: usize,
}

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("lyrics_providers", &self.lyrics_providers)
            .field("composer_providers", &self.composer_providers)
            .field(
                "happi_api_key",
                &self
                    .happi_api_key
                    .as_deref()
                    .map(|key| redact_if_sensitive("api_key", key)),
            )
            .field("endpoints", &self.endpoints)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("max_html_depth", &self.max_html_depth)
            .finish()
    }
}

impl ResolverConfig {
    /// Creates a new builder for constructing a `ResolverConfig`.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Builds a configuration from `SONGMETA_*` environment variables.
    ///
    /// Unset variables fall back to builder defaults.
    pub fn from_env() -> Result<Self> {
        Self::builder()
            .apply_env(|key| std::env::var(key).ok())?
            .build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Request timeout and HTML depth are non-zero
    /// - Every endpoint is an absolute http(s) URL
    /// - Provider keys are non-empty
    /// - Keyed providers have their API key, and the works registry its URL
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.max_html_depth == 0 {
            return Err(Error::Config(
                "HTML extraction depth must be greater than zero".to_string(),
            ));
        }

        for (name, url) in self.endpoints.all() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "Endpoint for '{}' must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        let mut all_keys = self.lyrics_providers.iter().chain(&self.composer_providers);
        if all_keys.any(|key| key.is_empty()) {
            return Err(Error::Config("Provider keys cannot be empty".to_string()));
        }

        if self.happi_api_key.is_none() {
            if let Some(key) = self
                .lyrics_providers
                .iter()
                .find(|key| KEYED_PROVIDERS.contains(&key.as_str()))
            {
                return Err(Error::Config(format!(
                    "Provider '{}' is enabled but no API key is configured ({})",
                    key,
                    env_keys::HAPPI_API_KEY
                )));
            }
        }

        if self.endpoints.works_registry.is_none()
            && self.composer_providers.iter().any(|key| key == "worksregistry")
        {
            return Err(Error::Config(format!(
                "Provider 'worksregistry' is enabled but no endpoint is configured ({})",
                env_keys::WORKS_REGISTRY_URL
            )));
        }

        Ok(())
    }
}

/// Lower-cases, trims and de-duplicates provider keys, keeping first occurrence.
pub fn normalize_provider_order<I, S>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut order: Vec<String> = Vec::new();
    for key in keys {
        let key = key.as_ref().trim().to_lowercase();
        if key.is_empty() || order.contains(&key) {
            continue;
        }
        order.push(key);
    }
    order
}

fn parse_provider_list(raw: &str) -> Vec<String> {
    normalize_provider_order(raw.split(','))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::{HttpClientConfig, ReqwestHttpClient};

    let client = ReqwestHttpClient::with_config(HttpClientConfig {
        timeout,
        user_agent: user_agent.to_string(),
        ..HttpClientConfig::default()
    })?;

    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(
    _timeout: Duration,
    _user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Other hosts: inject a platform-native adapter with .http_client()."
            .to_string(),
    })
}

/// Builder for constructing [`ResolverConfig`] instances.
#[derive(Default)]
pub struct ResolverConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    lyrics_providers: Option<Vec<String>>,
    composer_providers: Option<Vec<String>>,
    happi_api_key: Option<String>,
    endpoints: Option<ProviderEndpoints>,
    works_registry_url: Option<String>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
    max_html_depth: Option<usize>,
}

impl ResolverConfigBuilder {
    /// Sets the HTTP transport shared by all providers.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the lyrics provider order (keys such as `"chartlyrics"`).
    pub fn lyrics_providers<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lyrics_providers = Some(normalize_provider_order(keys));
        self
    }

    /// Sets the composer provider order.
    pub fn composer_providers<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.composer_providers = Some(normalize_provider_order(keys));
        self
    }

    /// Sets the Happi API key. Blank keys are ignored.
    pub fn happi_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.happi_api_key = Some(key.trim().to_string());
        }
        self
    }

    /// Overrides all provider base URLs.
    pub fn endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Sets the base URL of the works (composer) registry.
    pub fn works_registry_url(mut self, url: impl Into<String>) -> Self {
        self.works_registry_url = Some(url.into());
        self
    }

    /// Sets the per-call timeout. Default: 10 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent for the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the HTML extraction depth guard. Default: 64.
    pub fn max_html_depth(mut self, depth: usize) -> Self {
        self.max_html_depth = Some(depth);
        self
    }

    /// Applies `SONGMETA_*` variables resolved through `lookup`.
    ///
    /// Taking a lookup function keeps this testable without touching the
    /// process environment.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env_keys::LYRICS_PROVIDERS) {
            self.lyrics_providers = Some(parse_provider_list(&raw));
        }

        if let Some(raw) = lookup(env_keys::COMPOSER_PROVIDERS) {
            self.composer_providers = Some(parse_provider_list(&raw));
        }

        if let Some(key) = lookup(env_keys::HAPPI_API_KEY) {
            self = self.happi_api_key(key);
        }

        if let Some(url) = lookup(env_keys::WORKS_REGISTRY_URL) {
            self.works_registry_url = Some(url);
        }

        if let Some(raw) = lookup(env_keys::REQUEST_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    env_keys::REQUEST_TIMEOUT_SECS,
                    raw
                ))
            })?;
            self.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(user_agent) = lookup(env_keys::USER_AGENT) {
            self.user_agent = Some(user_agent);
        }

        Ok(self)
    }

    /// Builds the final `ResolverConfig` instance.
    ///
    /// # Errors
    ///
    /// - `CapabilityMissing` when no HTTP client was injected and the
    ///   `desktop-shims` feature is disabled
    /// - `Config` when validation fails
    pub fn build(self) -> Result<ResolverConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("songmeta/", env!("CARGO_PKG_VERSION")).to_string());

        let mut endpoints = self.endpoints.unwrap_or_default();
        if let Some(url) = self.works_registry_url {
            endpoints.works_registry = Some(url);
        }

        let has_happi_key = self.happi_api_key.is_some();
        let lyrics_providers = self.lyrics_providers.unwrap_or_else(|| {
            DEFAULT_LYRICS_PROVIDERS
                .iter()
                .filter(|key| has_happi_key || !KEYED_PROVIDERS.contains(*key))
                .map(|key| key.to_string())
                .collect()
        });

        let has_works_registry = endpoints.works_registry.is_some();
        let composer_providers = self.composer_providers.unwrap_or_else(|| {
            DEFAULT_COMPOSER_PROVIDERS
                .iter()
                .filter(|key| has_works_registry || **key != "worksregistry")
                .map(|key| key.to_string())
                .collect()
        });

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout, &user_agent)?,
        };

        let config = ResolverConfig {
            http_client,
            lyrics_providers,
            composer_providers,
            happi_api_key: self.happi_api_key,
            endpoints,
            request_timeout,
            user_agent,
            max_html_depth: self.max_html_depth.unwrap_or(DEFAULT_MAX_HTML_DEPTH),
        };

        config.validate()?;

        Ok(config)
    }
}

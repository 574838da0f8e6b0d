//! # Provider Adapters
//!
//! One adapter per external source. Every adapter implements
//! [`MetadataProvider`] and reports a tagged [`ProviderOutcome`]:
//!
//! - `Found` carries the payload plus the identity the provider claims for it
//! - `NotFound` covers "0 matches", empty payloads and missing page markers
//! - `Failed` covers timeouts, non-success statuses, SOAP faults and malformed
//!   payloads; the resolver logs it and moves on
//!
//! Only cancellation and misconfiguration travel through `Err`.
//!
//! ## Transports
//!
//! | Provider | Transport |
//! |----------|-----------|
//! | ChartLyrics | SOAP 1.1 |
//! | Happi | REST/JSON, API key |
//! | lyrics.ovh | REST/JSON |
//! | AZLyrics | HTML scrape |
//! | Genius | HTML scrape |
//! | Works registry | REST/JSON (composers) |

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_async::{cancellable, CancellationToken};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::query::SongQuery;

#[cfg(feature = "lyrics")]
pub mod azlyrics;
#[cfg(feature = "lyrics")]
pub mod chartlyrics;
#[cfg(feature = "lyrics")]
pub mod genius;
#[cfg(feature = "lyrics")]
pub mod happi;
#[cfg(feature = "lyrics")]
pub mod lyricsovh;
#[cfg(feature = "composers")]
pub mod works_registry;

#[cfg(feature = "lyrics")]
pub use azlyrics::AzLyricsProvider;
#[cfg(feature = "lyrics")]
pub use chartlyrics::ChartLyricsProvider;
#[cfg(feature = "lyrics")]
pub use genius::GeniusProvider;
#[cfg(feature = "lyrics")]
pub use happi::HappiProvider;
#[cfg(feature = "lyrics")]
pub use lyricsovh::LyricsOvhProvider;
#[cfg(feature = "composers")]
pub use works_registry::WorksRegistryProvider;

// =============================================================================
// Identifiers
// =============================================================================

/// What a provider resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Lyrics,
    Composers,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lyrics => "lyrics",
            Self::Composers => "composers",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    ChartLyrics,
    Happi,
    LyricsOvh,
    AzLyrics,
    Genius,
    WorksRegistry,
}

impl ProviderId {
    pub const ALL: [ProviderId; 6] = [
        Self::ChartLyrics,
        Self::Happi,
        Self::LyricsOvh,
        Self::AzLyrics,
        Self::Genius,
        Self::WorksRegistry,
    ];

    /// Configuration key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChartLyrics => "chartlyrics",
            Self::Happi => "happi",
            Self::LyricsOvh => "lyricsovh",
            Self::AzLyrics => "azlyrics",
            Self::Genius => "genius",
            Self::WorksRegistry => "worksregistry",
        }
    }

    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ChartLyrics => "ChartLyrics",
            Self::Happi => "Happi",
            Self::LyricsOvh => "lyrics.ovh",
            Self::AzLyrics => "AZLyrics",
            Self::Genius => "Genius",
            Self::WorksRegistry => "Works Registry",
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::WorksRegistry => ContentKind::Composers,
            _ => ContentKind::Lyrics,
        }
    }

    /// Parses a configuration key, case-insensitively, accepting common aliases.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "chartlyrics" | "chart_lyrics" | "chart-lyrics" => Some(Self::ChartLyrics),
            "happi" | "happi.dev" => Some(Self::Happi),
            "lyricsovh" | "lyrics.ovh" | "lyrics_ovh" | "lyrics-ovh" => Some(Self::LyricsOvh),
            "azlyrics" | "az_lyrics" | "az-lyrics" => Some(Self::AzLyrics),
            "genius" => Some(Self::Genius),
            "worksregistry" | "works_registry" | "works-registry" | "works" => {
                Some(Self::WorksRegistry)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s)
            .ok_or_else(|| MetadataError::Misconfigured(format!("Unknown provider: {}", s)))
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Artist and title a provider says its payload belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedIdentity {
    pub artist: String,
    pub title: String,
}

impl ClaimedIdentity {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

/// Payload returned by a provider.
///
/// `claimed` is `None` for sources whose request URL already encodes the
/// requested identity; those skip match validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub provider: ProviderId,
    pub content: String,
    pub claimed: Option<ClaimedIdentity>,
}

impl ProviderResult {
    pub fn new(provider: ProviderId, content: impl Into<String>) -> Self {
        Self {
            provider,
            content: content.into(),
            claimed: None,
        }
    }

    pub fn claimed(mut self, artist: impl Into<String>, title: impl Into<String>) -> Self {
        self.claimed = Some(ClaimedIdentity::new(artist, title));
        self
    }
}

/// Tagged result of one provider call.
#[derive(Debug)]
pub enum ProviderOutcome {
    Found(ProviderResult),
    NotFound,
    /// Anticipated transport or payload failure, already contained
    Failed(MetadataError),
}

// =============================================================================
// Provider Trait
// =============================================================================

/// An external metadata source.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn kind(&self) -> ContentKind {
        self.id().kind()
    }

    /// Queries the source for `query`.
    ///
    /// # Returns
    /// * `Ok(Found)` with the payload and any claimed identity
    /// * `Ok(NotFound)` when the source has nothing, or the query cannot be
    ///   expressed (blank title or artist) and no request was sent
    /// * `Ok(Failed)` for contained transport or payload failures
    /// * `Err(Cancelled)` if `token` fires first
    async fn fetch(&self, query: &SongQuery, token: &CancellationToken)
        -> Result<ProviderOutcome>;
}

// =============================================================================
// Shared transport helpers
// =============================================================================

/// Response of a provider call, or the outcome to report instead.
pub(crate) type Exchange = std::result::Result<HttpResponse, ProviderOutcome>;

/// Sends `request` under `token`.
///
/// Cancellation is the only `Err`. A 404 becomes `NotFound`; transport errors
/// and other non-success statuses become `Failed`.
pub(crate) async fn send(
    client: &dyn HttpClient,
    request: HttpRequest,
    token: &CancellationToken,
) -> Result<Exchange> {
    let url = request.url.clone();
    let response = match cancellable(token, client.execute(request)).await? {
        Ok(response) => response,
        Err(e) => return Ok(Err(ProviderOutcome::Failed(MetadataError::Bridge(e)))),
    };

    if response.status == 404 {
        debug!(url = %url, "Provider returned 404");
        return Ok(Err(ProviderOutcome::NotFound));
    }

    if !response.is_success() {
        let class = if response.is_server_error() {
            "server error"
        } else if response.is_client_error() {
            "client error"
        } else {
            "unexpected status"
        };
        return Ok(Err(ProviderOutcome::Failed(MetadataError::Transport(
            format!("HTTP {} ({}) from {}", response.status, class, url),
        ))));
    }

    Ok(Ok(response))
}

pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_round_trip() {
        for id in ProviderId::ALL {
            assert_eq!(ProviderId::from_key(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_provider_id_aliases() {
        assert_eq!(ProviderId::from_key(" Lyrics.OVH "), Some(ProviderId::LyricsOvh));
        assert_eq!(ProviderId::from_key("AZ_LYRICS"), Some(ProviderId::AzLyrics));
        assert_eq!(ProviderId::from_key("works"), Some(ProviderId::WorksRegistry));
        assert_eq!(ProviderId::from_key("lrclib"), None);
        assert!("musixmatch".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_provider_kinds() {
        assert_eq!(ProviderId::Genius.kind(), ContentKind::Lyrics);
        assert_eq!(ProviderId::WorksRegistry.kind(), ContentKind::Composers);
        assert_eq!(ProviderId::LyricsOvh.display_name(), "lyrics.ovh");
    }

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("https://genius.com/"), "https://genius.com");
        assert_eq!(trim_base("https://genius.com"), "https://genius.com");
    }
}

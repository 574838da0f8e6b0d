//! Metadata resolution service.
//!
//! Entry point for hosts: builds the provider registry from a
//! [`ResolverConfig`] and resolves lyrics or composers for a [`SongQuery`].
//!
//! ```rust,ignore
//! use core_metadata::{MetadataResolutionService, SongQuery};
//! use core_runtime::config::ResolverConfig;
//! use core_async::CancellationToken;
//!
//! let service = MetadataResolutionService::from_config(&ResolverConfig::from_env()?)?;
//! let query = SongQuery::new("Imagine", ["John Lennon"]);
//!
//! if let Some(lyrics) = service.fetch_lyrics(&query, &CancellationToken::new()).await? {
//!     println!("{}", lyrics);
//! }
//! ```

use core_async::CancellationToken;
use core_runtime::config::ResolverConfig;
use tracing::debug;

use crate::error::Result;
use crate::providers::ContentKind;
use crate::query::SongQuery;
use crate::registry::ProviderRegistry;
use crate::resolver::{Resolution, Resolver};

/// Orchestration policy used by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Providers tried one at a time in configured order
    #[default]
    Sequential,
    /// All providers queried at once; first validated result wins
    FanOut,
}

pub struct MetadataResolutionService {
    lyrics: Resolver,
    composers: Resolver,
    mode: ResolutionMode,
}

impl MetadataResolutionService {
    /// # Errors
    ///
    /// `Misconfigured` when a configured provider cannot be built.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        Ok(Self::from_registry(&ProviderRegistry::from_config(config)?))
    }

    pub fn from_registry(registry: &ProviderRegistry) -> Self {
        Self {
            lyrics: Resolver::new(registry.ordered(ContentKind::Lyrics)),
            composers: Resolver::new(registry.ordered(ContentKind::Composers)),
            mode: ResolutionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Lyrics text for `query`, or `None` if no provider has it.
    pub async fn fetch_lyrics(
        &self,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Option<String>> {
        Ok(self.resolve(ContentKind::Lyrics, query, token).await?.into_text())
    }

    /// Comma-separated writer list for `query`, or `None`.
    pub async fn fetch_composers(
        &self,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Option<String>> {
        Ok(self
            .resolve(ContentKind::Composers, query, token)
            .await?
            .into_text())
    }

    /// Resolves `kind` for `query` and returns the full attempt trace.
    pub async fn resolve(
        &self,
        kind: ContentKind,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Resolution> {
        let resolver = match kind {
            ContentKind::Lyrics => &self.lyrics,
            ContentKind::Composers => &self.composers,
        };

        debug!(kind = %kind, mode = ?self.mode, title = %query.title, "Resolving metadata");

        match self.mode {
            ResolutionMode::Sequential => resolver.resolve_with_trace(query, token).await,
            ResolutionMode::FanOut => resolver.resolve_concurrent_with_trace(query, token).await,
        }
    }
}

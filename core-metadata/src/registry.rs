//! Provider registry.
//!
//! Maps provider identifiers to adapter instances and remembers the
//! configured order per content kind. Selection and ordering come from
//! [`ResolverConfig`]; the resolver only ever sees the ordered list.

use std::collections::HashMap;
use std::sync::Arc;

use core_runtime::config::ResolverConfig;
use tracing::{debug, warn};

use crate::error::Result;
use crate::providers::{ContentKind, MetadataProvider, ProviderId};

#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn MetadataProvider>>,
    lyrics_order: Vec<ProviderId>,
    composer_order: Vec<ProviderId>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every provider named in `config`, in configured order.
    ///
    /// Unknown keys, keys listed under the wrong content kind and providers
    /// compiled out by feature flags are skipped with a warning.
    ///
    /// # Errors
    ///
    /// `Misconfigured` when a listed provider lacks required settings.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let mut registry = Self::new();

        let listed = [
            (ContentKind::Lyrics, &config.lyrics_providers),
            (ContentKind::Composers, &config.composer_providers),
        ];

        for (kind, keys) in listed {
            for key in keys {
                let Some(id) = ProviderId::from_key(key) else {
                    warn!(provider = %key, kind = %kind, "Unknown provider key, skipping");
                    continue;
                };

                if id.kind() != kind {
                    warn!(provider = %id, kind = %kind, "Provider listed under the wrong content kind, skipping");
                    continue;
                }

                match build_provider(id, config)? {
                    Some(provider) => registry.register(provider),
                    None => warn!(provider = %id, "Provider support not compiled in, skipping"),
                }
            }
        }

        debug!(
            lyrics = ?registry.lyrics_order,
            composers = ?registry.composer_order,
            "Provider registry ready"
        );

        Ok(registry)
    }

    /// Adds or replaces a provider. New providers go to the end of their kind's order.
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>) {
        let id = provider.id();
        let order = match provider.kind() {
            ContentKind::Lyrics => &mut self.lyrics_order,
            ContentKind::Composers => &mut self.composer_order,
        };
        if !order.contains(&id) {
            order.push(id);
        }
        self.providers.insert(id, provider);
    }

    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn MetadataProvider>> {
        self.providers.get(&id).cloned()
    }

    /// Providers for `kind` in configured order.
    pub fn ordered(&self, kind: ContentKind) -> Vec<Arc<dyn MetadataProvider>> {
        let order = match kind {
            ContentKind::Lyrics => &self.lyrics_order,
            ContentKind::Composers => &self.composer_order,
        };
        order.iter().filter_map(|id| self.get(*id)).collect()
    }
}

#[allow(unused_variables)]
fn build_provider(
    id: ProviderId,
    config: &ResolverConfig,
) -> Result<Option<Arc<dyn MetadataProvider>>> {
    let http = config.http_client.clone();
    let endpoints = &config.endpoints;
    let timeout = config.request_timeout;
    let depth = config.max_html_depth;

    let provider: Option<Arc<dyn MetadataProvider>> = match id {
        #[cfg(feature = "lyrics")]
        ProviderId::ChartLyrics => Some(Arc::new(
            crate::providers::ChartLyricsProvider::new(http, &endpoints.chartlyrics)
                .with_timeout(timeout),
        )),
        #[cfg(feature = "lyrics")]
        ProviderId::Happi => {
            let key = config.happi_api_key.clone().unwrap_or_default();
            Some(Arc::new(
                crate::providers::HappiProvider::new(http, &endpoints.happi, key)?
                    .with_timeout(timeout),
            ))
        }
        #[cfg(feature = "lyrics")]
        ProviderId::LyricsOvh => Some(Arc::new(
            crate::providers::LyricsOvhProvider::new(http, &endpoints.lyricsovh)
                .with_timeout(timeout),
        )),
        #[cfg(feature = "lyrics")]
        ProviderId::AzLyrics => Some(Arc::new(
            crate::providers::AzLyricsProvider::new(http, &endpoints.azlyrics)
                .with_timeout(timeout)
                .with_max_depth(depth),
        )),
        #[cfg(feature = "lyrics")]
        ProviderId::Genius => Some(Arc::new(
            crate::providers::GeniusProvider::new(http, &endpoints.genius)
                .with_timeout(timeout)
                .with_max_depth(depth),
        )),
        #[cfg(feature = "composers")]
        ProviderId::WorksRegistry => {
            let base_url = endpoints.works_registry.as_deref().ok_or_else(|| {
                crate::error::MetadataError::Misconfigured(
                    "worksregistry requires an endpoint URL".to_string(),
                )
            })?;
            Some(Arc::new(
                crate::providers::WorksRegistryProvider::new(http, base_url).with_timeout(timeout),
            ))
        }
        #[allow(unreachable_patterns)]
        _ => None,
    };

    Ok(provider)
}

//! Genius scrape provider.
//!
//! Lyrics live in `<div>` elements whose class starts with
//! `Lyrics__Container` (the suffix is a generated hash). Only the first
//! container is read.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_async::CancellationToken;
use core_runtime::config::DEFAULT_REQUEST_TIMEOUT;
use scraper::Html;
use tracing::debug;

use super::{send, trim_base, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::error::Result;
use crate::html::{extract_text, find_element, ExtractionRules};
use crate::normalize::{genius_slug, is_blank};
use crate::query::SongQuery;

const CONTAINER_PREFIX: &str = "Lyrics__Container";
const INLINE_TAGS: &[&str] = &["a", "b", "i", "em", "strong", "span"];

pub struct GeniusProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
    rules: ExtractionRules,
}

impl GeniusProvider {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl AsRef<str>) -> Self {
        Self {
            http_client,
            base_url: trim_base(base_url.as_ref()),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            rules: ExtractionRules::new(INLINE_TAGS, "br"),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.rules = self.rules.with_max_depth(max_depth);
        self
    }

    fn page_url(&self, query: &SongQuery) -> Option<String> {
        if !query.has_title() {
            return None;
        }
        let artist = query.performers_joined(" & ");
        if is_blank(&artist) {
            return None;
        }

        let slug = genius_slug(&format!("{} {}", artist, query.title));
        (!slug.is_empty()).then(|| format!("{}/{}-lyrics", self.base_url, slug))
    }

    /// Extracts the first lyric container from a full page.
    pub fn extract(&self, page: &str) -> Option<String> {
        let document = Html::parse_document(page);
        let container = find_element(&document, |el| {
            el.value().name() == "div"
                && el
                    .value()
                    .attr("class")
                    .is_some_and(|class| class.starts_with(CONTAINER_PREFIX))
        })?;

        let text = extract_text(container, &self.rules);
        (!is_blank(&text)).then_some(text)
    }
}

#[async_trait]
impl MetadataProvider for GeniusProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Genius
    }

    async fn fetch(&self, query: &SongQuery, token: &CancellationToken) -> Result<ProviderOutcome> {
        let Some(url) = self.page_url(query) else {
            return Ok(ProviderOutcome::NotFound);
        };

        let request = HttpRequest::get(url).timeout(self.timeout);
        let response = match send(self.http_client.as_ref(), request, token).await? {
            Ok(response) => response,
            Err(outcome) => return Ok(outcome),
        };

        core_async::cancel::ensure_active(token)?;

        match self.extract(&response.text_lossy()) {
            Some(text) => Ok(ProviderOutcome::Found(ProviderResult::new(
                ProviderId::Genius,
                text,
            ))),
            None => {
                debug!(title = %query.title, "Genius page has no lyrics container");
                Ok(ProviderOutcome::NotFound)
            }
        }
    }
}

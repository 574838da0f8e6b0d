//! AZLyrics scrape provider.
//!
//! The lyric block on an AZLyrics page is an unclassed `<div>` that follows
//! the `div.ringtone` marker among its siblings. A page without the marker
//! (unknown song, changed layout) is an ordinary "not found".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_async::CancellationToken;
use core_runtime::config::DEFAULT_REQUEST_TIMEOUT;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::{send, trim_base, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::error::Result;
use crate::html::{extract_text, find_element, ExtractionRules};
use crate::normalize::{azlyrics_slug, is_blank};
use crate::query::SongQuery;

const MARKER_CLASS: &str = "ringtone";
const INLINE_TAGS: &[&str] = &["b", "i", "em", "strong", "a", "span"];

pub struct AzLyricsProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
    rules: ExtractionRules,
}

impl AzLyricsProvider {
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

    /// `None` when either slug would be empty.
    fn page_url(&self, query: &SongQuery) -> Option<String> {
        let artist = azlyrics_slug(&query.performers_joined(" & "));
        let title = azlyrics_slug(&query.title);
        if artist.is_empty() || title.is_empty() {
            return None;
        }
        Some(format!("{}/lyrics/{}/{}.html", self.base_url, artist, title))
    }

    /// Extracts the lyric block from a full page.
    pub fn extract(&self, page: &str) -> Option<String> {
        let document = Html::parse_document(page);
        let marker = find_element(&document, |el| {
            el.value().name() == "div" && el.value().classes().any(|c| c == MARKER_CLASS)
        })?;

        let target = marker
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "div" && el.value().attr("class").is_none())?;

        let text = extract_text(target, &self.rules);
        (!is_blank(&text)).then_some(text)
    }
}

#[async_trait]
impl MetadataProvider for AzLyricsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::AzLyrics
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
                ProviderId::AzLyrics,
                text,
            ))),
            None => {
                debug!(title = %query.title, "AZLyrics page has no lyric block");
                Ok(ProviderOutcome::NotFound)
            }
        }
    }
}

//! Happi music API provider (API key required).
//!
//! Searches `/v1/music` for the best track match. The lyric text is read from
//! the track record when inlined, otherwise from the record's `api_lyrics`
//! link with a second keyed request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_async::CancellationToken;
use core_runtime::config::DEFAULT_REQUEST_TIMEOUT;
use serde::Deserialize;
use tracing::debug;

use super::{send, trim_base, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::error::{MetadataError, Result};
use crate::normalize::{is_blank, search_terms};
use crate::query::SongQuery;

const API_KEY_HEADER: &str = "x-happi-key";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<TrackRecord>,
}

#[derive(Debug, Deserialize)]
struct TrackRecord {
    #[serde(default)]
    artist: String,
    #[serde(default)]
    track: String,
    #[serde(default)]
    haslyrics: bool,
    #[serde(default)]
    lyrics: Option<String>,
    #[serde(default)]
    api_lyrics: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    success: bool,
    result: Option<LyricsRecord>,
}

#[derive(Debug, Deserialize)]
struct LyricsRecord {
    #[serde(default)]
    lyrics: String,
}

pub struct HappiProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HappiProvider {
    /// # Errors
    ///
    /// `Misconfigured` if `api_key` is blank.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if is_blank(&api_key) {
            return Err(MetadataError::Misconfigured(
                "Happi provider requires an API key".to_string(),
            ));
        }

        Ok(Self {
            http_client,
            base_url: trim_base(base_url.as_ref()),
            api_key: api_key.trim().to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn search_url(&self, query: &SongQuery) -> String {
        let terms = search_terms(&format!(
            "{} {}",
            query.performers_joined(" & "),
            query.title
        ));
        format!(
            "{}/v1/music?q={}&limit=1&lyrics=1&type=track",
            self.base_url,
            urlencoding::encode(&terms)
        )
    }

    fn keyed_get(&self, url: impl Into<String>) -> HttpRequest {
        HttpRequest::get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .timeout(self.timeout)
    }

    async fn linked_lyrics(&self, url: &str, token: &CancellationToken) -> Result<ProviderOutcome> {
        let response = match send(self.http_client.as_ref(), self.keyed_get(url), token).await? {
            Ok(response) => response,
            Err(outcome) => return Ok(outcome),
        };

        let body: LyricsResponse = match decode(&response) {
            Ok(body) => body,
            Err(outcome) => return Ok(outcome),
        };

        Ok(match body.result {
            Some(record) if body.success && !is_blank(&record.lyrics) => {
                ProviderOutcome::Found(ProviderResult::new(ProviderId::Happi, record.lyrics.trim()))
            }
            _ => ProviderOutcome::NotFound,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    response: &HttpResponse,
) -> std::result::Result<T, ProviderOutcome> {
    response
        .json()
        .map_err(|e| ProviderOutcome::Failed(MetadataError::Parse(e.to_string())))
}

#[async_trait]
impl MetadataProvider for HappiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Happi
    }

    async fn fetch(&self, query: &SongQuery, token: &CancellationToken) -> Result<ProviderOutcome> {
        if !query.has_title() || query.primary_performer().is_none() {
            return Ok(ProviderOutcome::NotFound);
        }

        let request = self.keyed_get(self.search_url(query));
        let response = match send(self.http_client.as_ref(), request, token).await? {
            Ok(response) => response,
            Err(outcome) => return Ok(outcome),
        };

        let search: SearchResponse = match decode(&response) {
            Ok(search) => search,
            Err(outcome) => return Ok(outcome),
        };

        let Some(track) = search.result.into_iter().next().filter(|_| search.success) else {
            debug!(title = %query.title, "Happi search returned no tracks");
            return Ok(ProviderOutcome::NotFound);
        };

        let text = match (track.lyrics, track.api_lyrics) {
            (Some(lyrics), _) if !is_blank(&lyrics) => lyrics,
            (_, Some(link)) if track.haslyrics => {
                match self.linked_lyrics(&link, token).await? {
                    ProviderOutcome::Found(result) => result.content,
                    other => return Ok(other),
                }
            }
            _ => return Ok(ProviderOutcome::NotFound),
        };

        Ok(ProviderOutcome::Found(
            ProviderResult::new(ProviderId::Happi, text.trim()).claimed(track.artist, track.track),
        ))
    }
}

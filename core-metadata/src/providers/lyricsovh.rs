//! lyrics.ovh REST provider.
//!
//! `GET /v1/{artist}/{title}` answers `{"lyrics": "..."}` or a 404. The URL
//! carries the identity, so no claimed identity is reported.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_async::CancellationToken;
use core_runtime::config::DEFAULT_REQUEST_TIMEOUT;
use serde::Deserialize;

use super::{send, trim_base, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::error::{MetadataError, Result};
use crate::normalize::is_blank;
use crate::query::SongQuery;

#[derive(Debug, Deserialize)]
struct LyricsBody {
    #[serde(default)]
    lyrics: Option<String>,
}

pub struct LyricsOvhProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl LyricsOvhProvider {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl AsRef<str>) -> Self {
        Self {
            http_client,
            base_url: trim_base(base_url.as_ref()),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn lyrics_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl MetadataProvider for LyricsOvhProvider {
    fn id(&self) -> ProviderId {
        ProviderId::LyricsOvh
    }

    async fn fetch(&self, query: &SongQuery, token: &CancellationToken) -> Result<ProviderOutcome> {
        let Some(artist) = query.primary_performer() else {
            return Ok(ProviderOutcome::NotFound);
        };
        if !query.has_title() {
            return Ok(ProviderOutcome::NotFound);
        }

        let request =
            HttpRequest::get(self.lyrics_url(artist, query.title.trim())).timeout(self.timeout);
        let response = match send(self.http_client.as_ref(), request, token).await? {
            Ok(response) => response,
            Err(outcome) => return Ok(outcome),
        };

        let body: LyricsBody = match response.json() {
            Ok(body) => body,
            Err(e) => return Ok(ProviderOutcome::Failed(MetadataError::Parse(e.to_string()))),
        };

        Ok(match body.lyrics {
            Some(lyrics) if !is_blank(&lyrics) => {
                ProviderOutcome::Found(ProviderResult::new(ProviderId::LyricsOvh, lyrics.trim()))
            }
            _ => ProviderOutcome::NotFound,
        })
    }
}

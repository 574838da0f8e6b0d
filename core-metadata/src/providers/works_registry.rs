//! Works registry provider (composers).
//!
//! Queries a musical-works registry for works by title and performer and
//! returns the writers of the first work whose title and one of whose
//! performers match the query.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_async::CancellationToken;
use core_runtime::config::DEFAULT_REQUEST_TIMEOUT;
use serde::Deserialize;
use tracing::debug;

use super::{send, trim_base, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::error::{MetadataError, Result};
use crate::matcher::is_match;
use crate::query::SongQuery;

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    works: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: String,
    #[serde(default)]
    writers: Vec<Party>,
    #[serde(default)]
    performers: Vec<Party>,
}

#[derive(Debug, Deserialize)]
struct Party {
    #[serde(default)]
    name: String,
}

pub struct WorksRegistryProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl WorksRegistryProvider {
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

    fn works_url(&self, title: &str, performer: &str) -> String {
        format!(
            "{}/works?works=true&title={}&writer=&performer={}",
            self.base_url,
            urlencoding::encode(title),
            urlencoding::encode(performer)
        )
    }

    /// Writers of the first work matching `query`, with the identity that matched.
    fn select(works: Vec<Work>, query: &SongQuery) -> Option<ProviderResult> {
        let candidates = query.artist_candidates();

        works.into_iter().find_map(|work| {
            let performer = work.performers.iter().find(|performer| {
                candidates
                    .iter()
                    .any(|artist| is_match(&performer.name, &work.title, artist, &query.title))
            })?;

            let writers = work
                .writers
                .iter()
                .map(|writer| writer.name.trim())
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", ");

            (!writers.is_empty()).then(|| {
                ProviderResult::new(ProviderId::WorksRegistry, writers)
                    .claimed(performer.name.clone(), work.title.clone())
            })
        })
    }
}

#[async_trait]
impl MetadataProvider for WorksRegistryProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WorksRegistry
    }

    async fn fetch(&self, query: &SongQuery, token: &CancellationToken) -> Result<ProviderOutcome> {
        let Some(performer) = query.primary_performer() else {
            return Ok(ProviderOutcome::NotFound);
        };
        if !query.has_title() {
            return Ok(ProviderOutcome::NotFound);
        }

        let request = HttpRequest::get(self.works_url(query.title.trim(), performer))
            .header("Accept", "application/json")
            .timeout(self.timeout);
        let response = match send(self.http_client.as_ref(), request, token).await? {
            Ok(response) => response,
            Err(outcome) => return Ok(outcome),
        };

        let body: WorksResponse = match response.json() {
            Ok(body) => body,
            Err(e) => return Ok(ProviderOutcome::Failed(MetadataError::Parse(e.to_string()))),
        };

        let total = body.works.len();
        match Self::select(body.works, query) {
            Some(result) => Ok(ProviderOutcome::Found(result)),
            None => {
                debug!(title = %query.title, works = total, "No registered work matched");
                Ok(ProviderOutcome::NotFound)
            }
        }
    }
}

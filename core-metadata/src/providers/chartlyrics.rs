//! ChartLyrics SOAP provider.
//!
//! Calls the `SearchLyricDirect` operation and validates the artist/song the
//! service claims against the query.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_async::CancellationToken;
use core_runtime::config::DEFAULT_REQUEST_TIMEOUT;
use roxmltree::{Document, Node};
use tracing::debug;

use super::{send, trim_base, MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::error::{MetadataError, Result};
use crate::normalize::{escape_markup, is_blank};
use crate::query::SongQuery;

const SOAP_ACTION: &str = "http://api.chartlyrics.com/SearchLyricDirect";

pub struct ChartLyricsProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl ChartLyricsProvider {
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

    fn envelope(artist: &str, song: &str) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
                r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
                r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
                r#"<soap:Body><SearchLyricDirect xmlns="http://api.chartlyrics.com/">"#,
                "<artist>{}</artist><song>{}</song>",
                "</SearchLyricDirect></soap:Body></soap:Envelope>"
            ),
            escape_markup(artist),
            escape_markup(song)
        )
    }

    /// Reads a `SearchLyricDirect` response body.
    fn parse_response(body: &str) -> ProviderOutcome {
        let document = match Document::parse(body) {
            Ok(document) => document,
            Err(e) => {
                return ProviderOutcome::Failed(MetadataError::Parse(format!(
                    "Invalid SOAP response: {}",
                    e
                )))
            }
        };

        if let Some(fault) = find_descendant(document.root(), "Fault") {
            let reason = child_text(fault, "faultstring").unwrap_or("unknown fault");
            return ProviderOutcome::Failed(MetadataError::Transport(format!(
                "SOAP fault: {}",
                reason
            )));
        }

        let Some(result) = find_descendant(document.root(), "SearchLyricDirectResult") else {
            return ProviderOutcome::Failed(MetadataError::Parse(
                "SearchLyricDirectResult missing".to_string(),
            ));
        };

        let lyric = child_text(result, "Lyric").unwrap_or_default();
        if is_blank(lyric) {
            return ProviderOutcome::NotFound;
        }

        let artist = child_text(result, "LyricArtist").unwrap_or_default();
        let song = child_text(result, "LyricSong").unwrap_or_default();

        ProviderOutcome::Found(
            ProviderResult::new(ProviderId::ChartLyrics, lyric.trim()).claimed(artist, song),
        )
    }
}

fn find_descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
}

#[async_trait]
impl MetadataProvider for ChartLyricsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ChartLyrics
    }

    async fn fetch(&self, query: &SongQuery, token: &CancellationToken) -> Result<ProviderOutcome> {
        let artist = query.performers_joined(" & ");
        if !query.has_title() || is_blank(&artist) {
            return Ok(ProviderOutcome::NotFound);
        }

        let request = HttpRequest::post(format!("{}/apiv1.asmx", self.base_url))
            .header("SOAPAction", format!("\"{}\"", SOAP_ACTION))
            .text_body(
                "text/xml; charset=utf-8",
                Self::envelope(&artist, query.title.trim()),
            )
            .timeout(self.timeout);

        let response = match send(self.http_client.as_ref(), request, token).await? {
            Ok(response) => response,
            Err(outcome) => return Ok(outcome),
        };

        let outcome = Self::parse_response(&response.text_lossy());
        if matches!(outcome, ProviderOutcome::NotFound) {
            debug!(title = %query.title, "ChartLyrics returned an empty lyric");
        }
        Ok(outcome)
    }
}

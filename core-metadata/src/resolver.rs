//! # Resolution Orchestrator
//!
//! Runs an ordered list of providers for one [`SongQuery`] and returns the
//! first validated, non-empty payload.
//!
//! ## Policies
//!
//! - [`Resolver::resolve`]: sequential. Providers run strictly in list order,
//!   one call in flight at a time; the first accepted result stops the loop.
//! - [`Resolver::resolve_concurrent`]: fan-out. Every provider starts at once
//!   under a child token; the first accepted result wins and the remaining
//!   calls are cancelled and dropped. Which provider wins depends on network
//!   timing, so results may differ between runs when several providers know
//!   the song.
//!
//! ## Failure policy
//!
//! `NotFound`, `Failed` and validator mismatches all mean "try the next
//! provider". Cancellation is returned as [`MetadataError::Cancelled`], never
//! as `Ok(None)`, and no payload is validated once the token has fired.
//! Any other `Err` from a provider is a defect and propagates unchanged.

use std::sync::Arc;

use core_async::cancel::{cancellable, ensure_active, CancellationToken};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::matcher::{evaluate, MatchDecision};
use crate::normalize::is_blank;
use crate::providers::{MetadataProvider, ProviderId, ProviderOutcome, ProviderResult};
use crate::query::SongQuery;

/// How one provider attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum AttemptStatus {
    Found,
    NotFound,
    /// Payload rejected by the match validator
    Mismatch,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub provider: ProviderId,
    pub status: AttemptStatus,
}

/// Outcome of a resolution plus the per-provider trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub content: Option<ProviderResult>,
    pub attempts: Vec<AttemptRecord>,
}

impl Resolution {
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().map(|result| result.content.as_str())
    }

    pub fn provider(&self) -> Option<ProviderId> {
        self.content.as_ref().map(|result| result.provider)
    }

    pub fn into_text(self) -> Option<String> {
        self.content.map(|result| result.content)
    }
}

pub struct Resolver {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl Resolver {
    pub fn new(providers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.providers.iter().map(|provider| provider.id())
    }

    /// Sequential resolution: first validated content, or `None`.
    ///
    /// # Errors
    ///
    /// `Cancelled` if `token` fires before a result is accepted.
    pub async fn resolve(
        &self,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Option<String>> {
        Ok(self.resolve_with_trace(query, token).await?.into_text())
    }

    /// Sequential resolution returning the attempt trace.
    pub async fn resolve_with_trace(
        &self,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Resolution> {
        let mut resolution = Resolution::default();

        for provider in &self.providers {
            ensure_active(token)?;

            let id = provider.id();
            info!(provider = %id, title = %query.title, "Attempting provider");

            let outcome = provider.fetch(query, token).await?;
            ensure_active(token)?;

            let (status, accepted) = judge(id, outcome, query);
            resolution.attempts.push(AttemptRecord {
                provider: id,
                status,
            });

            if let Some(result) = accepted {
                info!(provider = %id, title = %query.title, "Resolved metadata");
                resolution.content = Some(result);
                return Ok(resolution);
            }
        }

        info!(
            title = %query.title,
            attempts = resolution.attempts.len(),
            "No provider resolved the query"
        );
        Ok(resolution)
    }

    /// Fan-out resolution: first validated content from any provider.
    pub async fn resolve_concurrent(
        &self,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Option<String>> {
        Ok(self
            .resolve_concurrent_with_trace(query, token)
            .await?
            .into_text())
    }

    /// Fan-out resolution returning the attempts that finished before the winner.
    pub async fn resolve_concurrent_with_trace(
        &self,
        query: &SongQuery,
        token: &CancellationToken,
    ) -> Result<Resolution> {
        ensure_active(token)?;

        let branch = token.child_token();
        // Losers are cancelled on every exit path, including errors.
        let _cancel_losers = branch.clone().drop_guard();

        let mut pending: FuturesUnordered<_> = self
            .providers
            .iter()
            .map(|provider| {
                let branch = &branch;
                async move {
                    info!(provider = %provider.id(), title = %query.title, "Attempting provider");
                    (provider.id(), provider.fetch(query, branch).await)
                }
            })
            .collect();

        let mut resolution = Resolution::default();

        while let Some((id, outcome)) = cancellable(token, pending.next()).await? {
            let outcome = outcome?;
            ensure_active(token)?;

            let (status, accepted) = judge(id, outcome, query);
            resolution.attempts.push(AttemptRecord {
                provider: id,
                status,
            });

            if let Some(result) = accepted {
                branch.cancel();
                debug!(
                    provider = %id,
                    abandoned = pending.len(),
                    "Cancelled remaining providers"
                );
                info!(provider = %id, title = %query.title, "Resolved metadata");
                resolution.content = Some(result);
                return Ok(resolution);
            }
        }

        info!(
            title = %query.title,
            attempts = resolution.attempts.len(),
            "No provider resolved the query"
        );
        Ok(resolution)
    }
}

/// Classifies one outcome and runs validation on payloads.
fn judge(
    id: ProviderId,
    outcome: ProviderOutcome,
    query: &SongQuery,
) -> (AttemptStatus, Option<ProviderResult>) {
    match outcome {
        ProviderOutcome::Found(result) if is_blank(&result.content) => {
            debug!(provider = %id, "Provider returned an empty payload");
            (AttemptStatus::NotFound, None)
        }
        ProviderOutcome::Found(result) => match evaluate(result.claimed.as_ref(), query) {
            MatchDecision::Rejected => {
                if let Some(claimed) = &result.claimed {
                    debug!(
                        provider = %id,
                        claimed_artist = %claimed.artist,
                        claimed_title = %claimed.title,
                        title = %query.title,
                        "Provider result does not match query"
                    );
                }
                (AttemptStatus::Mismatch, None)
            }
            MatchDecision::Accepted | MatchDecision::Exempt => (AttemptStatus::Found, Some(result)),
        },
        ProviderOutcome::NotFound => {
            debug!(provider = %id, title = %query.title, "Not found at provider");
            (AttemptStatus::NotFound, None)
        }
        ProviderOutcome::Failed(error) => {
            warn!(provider = %id, error = %error, "Provider fetch failed");
            (AttemptStatus::Failed(error.to_string()), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;

    #[test]
    fn test_judge_rejects_blank_payload() {
        let query = SongQuery::new("Imagine", ["John Lennon"]);
        let outcome = ProviderOutcome::Found(ProviderResult::new(ProviderId::Genius, " \n "));
        let (status, accepted) = judge(ProviderId::Genius, outcome, &query);

        assert_eq!(status, AttemptStatus::NotFound);
        assert!(accepted.is_none());
    }

    #[test]
    fn test_judge_mismatch() {
        let query = SongQuery::new("Hey Jude", ["The Beatles"]);
        let outcome = ProviderOutcome::Found(
            ProviderResult::new(ProviderId::ChartLyrics, "text").claimed("The Beatles", "Let It Be"),
        );
        let (status, accepted) = judge(ProviderId::ChartLyrics, outcome, &query);

        assert_eq!(status, AttemptStatus::Mismatch);
        assert!(accepted.is_none());
    }

    #[test]
    fn test_judge_failed_keeps_reason() {
        let query = SongQuery::new("Hey Jude", ["The Beatles"]);
        let outcome = ProviderOutcome::Failed(MetadataError::Transport("HTTP 503".to_string()));
        let (status, _) = judge(ProviderId::Happi, outcome, &query);

        assert_eq!(status, AttemptStatus::Failed("Transport failure: HTTP 503".to_string()));
    }

    #[tokio::test]
    async fn test_empty_resolver() {
        let resolver = Resolver::new(Vec::new());
        let token = CancellationToken::new();
        let query = SongQuery::new("Imagine", ["John Lennon"]);

        assert_eq!(resolver.resolve(&query, &token).await.unwrap(), None);
        assert_eq!(resolver.resolve_concurrent(&query, &token).await.unwrap(), None);
    }
}

//! Match validation.
//!
//! Free-text services often answer with the wrong song. A provider's claimed
//! artist/title is compared to the query before the payload is trusted:
//! case-insensitive equality first, then a second pass that treats hyphens
//! as spaces. The folding is used only for comparison, never for display.

use crate::providers::{ClaimedIdentity, ProviderResult};
use crate::query::SongQuery;

/// Result of comparing a claimed identity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    Accepted,
    /// The provider claimed nothing; its URL already encoded the query
    Exempt,
    Rejected,
}

impl MatchDecision {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Compares claimed artist and title to the query's artist and title.
pub fn is_match(
    claimed_artist: &str,
    claimed_title: &str,
    query_artist: &str,
    query_title: &str,
) -> bool {
    fields_match(claimed_artist, query_artist) && fields_match(claimed_title, query_title)
}

/// Decides whether `claimed` belongs to `query`, trying every artist candidate.
pub fn evaluate(claimed: Option<&ClaimedIdentity>, query: &SongQuery) -> MatchDecision {
    let Some(claimed) = claimed else {
        return MatchDecision::Exempt;
    };

    let matched = query
        .artist_candidates()
        .iter()
        .any(|artist| is_match(&claimed.artist, &claimed.title, artist, &query.title));

    if matched {
        MatchDecision::Accepted
    } else {
        MatchDecision::Rejected
    }
}

/// Returns `result` if it passes validation for `query`.
pub fn validate(result: ProviderResult, query: &SongQuery) -> Option<ProviderResult> {
    evaluate(result.claimed.as_ref(), query)
        .is_accepted()
        .then_some(result)
}

fn fields_match(claimed: &str, wanted: &str) -> bool {
    let claimed = claimed.trim();
    let wanted = wanted.trim();

    if claimed.to_lowercase() == wanted.to_lowercase() {
        return true;
    }

    fold_hyphens(claimed) == fold_hyphens(wanted)
}

fn fold_hyphens(value: &str) -> String {
    value.replace('-', " ").to_lowercase()
}

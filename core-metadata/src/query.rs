//! Song identity as supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::normalize::is_blank;

/// The song being resolved: title, ordered performers and an optional album.
///
/// Immutable once built. Provider-specific query forms are derived from it on
/// every request by the functions in [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongQuery {
    pub title: String,
    pub performers: Vec<String>,
    pub album: Option<String>,
}

impl SongQuery {
    pub fn new<I, S>(title: impl Into<String>, performers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            performers: performers.into_iter().map(Into::into).collect(),
            album: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// First non-blank performer, trimmed.
    pub fn primary_performer(&self) -> Option<&str> {
        self.performers
            .iter()
            .map(|p| p.trim())
            .find(|p| !p.is_empty())
    }

    /// Non-blank performers, trimmed and joined with `separator`.
    pub fn performers_joined(&self, separator: &str) -> String {
        self.performers
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Artist strings a provider's claimed artist may legitimately equal.
    ///
    /// Every individual performer, then the `" & "` and `", "` joins when
    /// there is more than one.
    pub fn artist_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = self
            .performers
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if candidates.len() > 1 {
            let joined_amp = self.performers_joined(" & ");
            let joined_comma = self.performers_joined(", ");
            candidates.push(joined_amp);
            candidates.push(joined_comma);
        }

        candidates
    }

    pub fn has_title(&self) -> bool {
        !is_blank(&self.title)
    }
}

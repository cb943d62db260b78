use serde::{Deserialize, Serialize};

/// A track attached to a question.
///
/// Playback identity is the preview URL. A track without one can still be
/// displayed but never produces audio.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub preview_url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub album_art: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

impl Track {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_preview(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }

    /// Preview URL, ignoring blank values sent by the backend.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    #[must_use]
    pub fn has_preview(&self) -> bool {
        self.preview().is_some()
    }

    /// Two tracks are the same playback target when both carry the same preview URL.
    #[must_use]
    pub fn same_preview(&self, other: &Track) -> bool {
        match (self.preview(), other.preview()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Track details revealed after an answer is graded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub album_art: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

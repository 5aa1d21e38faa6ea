//! Player identity entity.

use serde::{Deserialize, Serialize};

/// Stable opaque key naming a player (usually a UUID string).
///
/// Providers and the preference cache key strictly on this value; the
/// human-readable name never takes part in lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a new `PlayerId`, trimming surrounding whitespace.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identity is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything needed to resolve one avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRequest {
    /// Identity used for provider URLs and the preference cache.
    pub player_id: PlayerId,
    /// Display name, only used for the placeholder glyph.
    pub label: String,
    /// Edge length in pixels.
    pub size: u32,
    /// Whether the skin's outer layer (hat/helm) is rendered.
    pub overlay: bool,
}

impl AvatarRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(
        player_id: impl Into<PlayerId>,
        label: impl Into<String>,
        size: u32,
        overlay: bool,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            label: label.into(),
            size,
            overlay,
        }
    }
}

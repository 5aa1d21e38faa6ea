//! Avatar image providers.
//!
//! The registry is fixed: three public skin renderers in priority order.
//! Each provider turns `(identity, size, overlay)` into the URL shape its
//! service documents, without touching the network.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A third-party avatar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvatarProvider {
    /// <https://crafatar.com>
    Crafatar,
    /// <https://mc-heads.net>
    McHeads,
    /// <https://minotar.net>
    Minotar,
}

impl AvatarProvider {
    /// All providers in default probe priority.
    pub const ALL: [Self; 3] = [Self::Crafatar, Self::McHeads, Self::Minotar];

    /// Stable name used in logs and in the preference cache.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crafatar => "crafatar",
            Self::McHeads => "mc-heads",
            Self::Minotar => "minotar",
        }
    }

    /// Host serving this provider's images.
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Crafatar => "crafatar.com",
            Self::McHeads => "mc-heads.net",
            Self::Minotar => "minotar.net",
        }
    }

    /// Builds the candidate avatar URL for this provider.
    #[must_use]
    pub fn build_url(self, player_id: &PlayerId, size: u32, overlay: bool) -> String {
        let id = player_id.as_str();
        match self {
            Self::Crafatar => {
                let mut url = format!("https://crafatar.com/avatars/{id}?size={size}");
                if overlay {
                    url.push_str("&overlay");
                }
                url
            }
            Self::McHeads => {
                let mut url = format!("https://mc-heads.net/avatar/{id}/{size}");
                if !overlay {
                    url.push_str("/nohelm");
                }
                url
            }
            Self::Minotar => {
                let kind = if overlay { "helm" } else { "avatar" };
                format!("https://minotar.net/{kind}/{id}/{size}.png")
            }
        }
    }
}

impl std::fmt::Display for AvatarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a provider name is not part of the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown avatar provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for AvatarProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.name() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Returns the provider registry in priority order.
#[must_use]
pub const fn list_providers() -> &'static [AvatarProvider] {
    &AvatarProvider::ALL
}

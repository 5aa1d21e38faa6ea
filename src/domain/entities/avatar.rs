//! Resolved avatar types.

use super::AvatarProvider;

/// Where a resolved avatar URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSource {
    /// A provider answered the existence check.
    Provider(AvatarProvider),
    /// No provider was usable; the URL is a generated data URL.
    Placeholder,
}

impl AvatarSource {
    /// Returns the winning provider, if any.
    #[must_use]
    pub const fn provider(self) -> Option<AvatarProvider> {
        match self {
            Self::Provider(provider) => Some(provider),
            Self::Placeholder => None,
        }
    }
}

impl std::fmt::Display for AvatarSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(provider) => write!(f, "{provider}"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Outcome of a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAvatar {
    /// Displayable image URL.
    pub url: String,
    /// Origin of the URL.
    pub source: AvatarSource,
}

impl ResolvedAvatar {
    /// Creates a result pointing at a provider URL.
    #[must_use]
    pub fn from_provider(provider: AvatarProvider, url: String) -> Self {
        Self {
            url,
            source: AvatarSource::Provider(provider),
        }
    }

    /// Creates a placeholder result.
    #[must_use]
    pub fn placeholder(url: String) -> Self {
        Self {
            url,
            source: AvatarSource::Placeholder,
        }
    }

    /// Returns the URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Consumes the result, returning the URL.
    #[must_use]
    pub fn into_url(self) -> String {
        self.url
    }

    /// Returns true if this is the generated fallback.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.source, AvatarSource::Placeholder)
    }
}

//! Cached provider preference entries.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AvatarProvider;

/// Last provider that worked for an identity.
///
/// The provider is kept as its raw name so a blob written by a build with a
/// different registry still deserializes; unknown names are simply ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    /// Provider name.
    pub provider: String,
    /// Time of the successful resolution.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl PreferenceEntry {
    /// Creates an entry for a provider at the given time.
    #[must_use]
    pub fn new(provider: AvatarProvider, timestamp: DateTime<Utc>) -> Self {
        Self {
            provider: provider.name().to_string(),
            timestamp,
        }
    }

    /// Returns true if the entry is younger than `window` at `now`.
    /// Entries stamped in the future count as fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.timestamp)
            .to_std()
            .map_or(true, |age| age < window)
    }

    /// Parses the stored provider name.
    #[must_use]
    pub fn provider(&self) -> Option<AvatarProvider> {
        self.provider.parse().ok()
    }
}

/// Whole cache blob, keyed by identity string.
pub type PreferenceTable = HashMap<String, PreferenceEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + chrono::Duration::hours(hours)
    }

    #[test]
    fn test_freshness_window() {
        let entry = PreferenceEntry::new(AvatarProvider::Minotar, at(0));
        let window = Duration::from_secs(24 * 60 * 60);

        assert!(entry.is_fresh(at(0), window));
        assert!(entry.is_fresh(at(23), window));
        assert!(!entry.is_fresh(at(24), window));
        assert!(!entry.is_fresh(at(48), window));
        assert!(entry.is_fresh(at(-1), window));
    }

    #[test]
    fn test_serialized_shape() {
        let entry = PreferenceEntry::new(AvatarProvider::McHeads, at(0));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["provider"], "mc-heads");
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
    }

    #[test]
    fn test_unknown_provider_name() {
        let entry: PreferenceEntry =
            serde_json::from_str(r#"{"provider":"gravatar","timestamp":0}"#).unwrap();
        assert_eq!(entry.provider(), None);
    }
}

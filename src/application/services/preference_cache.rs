//! Identity -> last working provider, with a freshness window.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{AvatarProvider, PlayerId, PreferenceEntry, PreferenceTable};
use crate::domain::ports::{ClockPort, KeyValueStorePort};

/// Storage key holding the whole preference table.
pub const PREFERENCE_CACHE_KEY: &str = "avatar-provider-cache";

/// Default age after which an entry stops being a priming hint.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Persistent provider preference cache.
///
/// The table is stored as one JSON blob under [`PREFERENCE_CACHE_KEY`].
/// Every storage or decoding problem degrades to "no preference"; nothing
/// here returns an error. Writes are serialized so a read-modify-write for
/// one identity never drops another identity's entry.
pub struct PreferenceCache {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
    freshness: Duration,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for PreferenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceCache")
            .field("freshness", &self.freshness)
            .finish_non_exhaustive()
    }
}

enum TableRead {
    Loaded(PreferenceTable),
    Corrupt,
    Unavailable,
}

impl PreferenceCache {
    /// Creates a cache over the given store.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStorePort>,
        clock: Arc<dyn ClockPort>,
        freshness: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            freshness,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the freshness window.
    #[must_use]
    pub const fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Returns the preferred provider if a fresh entry exists.
    pub async fn get(&self, player_id: &PlayerId) -> Option<AvatarProvider> {
        let entry = self.entry(player_id).await?;

        if !entry.is_fresh(self.clock.now(), self.freshness) {
            debug!(player = %player_id, provider = %entry.provider, "Cached provider is stale");
            return None;
        }

        entry.provider()
    }

    /// Returns the raw entry for an identity, fresh or not.
    pub async fn entry(&self, player_id: &PlayerId) -> Option<PreferenceEntry> {
        match self.read_table().await {
            TableRead::Loaded(mut table) => table.remove(player_id.as_str()),
            TableRead::Corrupt | TableRead::Unavailable => None,
        }
    }

    /// Records `provider` as the last working provider for an identity.
    pub async fn set(&self, player_id: &PlayerId, provider: AvatarProvider) {
        let _guard = self.write_lock.lock().await;
        let mut table = match self.read_table().await {
            TableRead::Loaded(table) => table,
            TableRead::Corrupt => PreferenceTable::new(),
            TableRead::Unavailable => return,
        };

        table.insert(
            player_id.as_str().to_string(),
            PreferenceEntry::new(provider, self.clock.now()),
        );

        let blob = match serde_json::to_string(&table) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to serialize provider cache");
                return;
            }
        };

        if let Err(e) = self.store.set(PREFERENCE_CACHE_KEY, blob).await {
            warn!(player = %player_id, error = %e, "Failed to write provider cache");
        } else {
            debug!(player = %player_id, provider = %provider, "Cached preferred provider");
        }
    }

    /// Drops every cached preference.
    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.store.remove(PREFERENCE_CACHE_KEY).await {
            warn!(error = %e, "Failed to clear provider cache");
        }
    }

    async fn read_table(&self) -> TableRead {
        let blob = match self.store.get(PREFERENCE_CACHE_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return TableRead::Loaded(PreferenceTable::new()),
            Err(e) => {
                warn!(error = %e, "Failed to read provider cache");
                return TableRead::Unavailable;
            }
        };

        match serde_json::from_str(&blob) {
            Ok(table) => TableRead::Loaded(table),
            Err(e) => {
                warn!(error = %e, "Provider cache is corrupt, ignoring it");
                TableRead::Corrupt
            }
        }
    }
}

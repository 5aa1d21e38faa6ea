//! Avatar resolution use case.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info};

use crate::application::services::preference_cache::DEFAULT_FRESHNESS_WINDOW;
use crate::application::services::provider_probe::DEFAULT_PROBE_TIMEOUT;
use crate::application::services::{PreferenceCache, ProviderProbe};
use crate::domain::entities::{
    AvatarProvider, AvatarRequest, PlayerId, ResolvedAvatar, list_providers,
};
use crate::domain::ports::{ClockPort, ExistenceCheckPort, KeyValueStorePort};
use crate::domain::services::generate_placeholder;

/// Tunables for avatar resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Deadline for a single provider probe.
    pub probe_timeout: Duration,
    /// Age after which a cached provider no longer jumps the queue.
    pub freshness_window: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }
}

/// Returns the probe order: the preferred provider first, then the rest of
/// the registry in registry order.
#[must_use]
pub fn candidate_order(preferred: Option<AvatarProvider>) -> Vec<AvatarProvider> {
    let mut order = Vec::with_capacity(list_providers().len());
    if let Some(provider) = preferred {
        order.push(provider);
    }
    for &provider in list_providers() {
        if !order.contains(&provider) {
            order.push(provider);
        }
    }
    order
}

/// Resolves a player identity to a displayable avatar URL.
///
/// All candidates are probed concurrently and every probe is allowed to
/// settle. The winner is the first usable candidate in candidate order, not
/// the first to answer, so a given set of outcomes always picks the same
/// provider. Resolution never fails: when nothing is usable the generated
/// placeholder is returned and the cache is left untouched.
pub struct AvatarResolver {
    probe: ProviderProbe,
    cache: PreferenceCache,
}

impl std::fmt::Debug for AvatarResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarResolver")
            .field("probe", &self.probe)
            .field("cache", &self.cache)
            .finish()
    }
}

impl AvatarResolver {
    /// Creates a resolver from its collaborators.
    #[must_use]
    pub fn new(
        checker: Arc<dyn ExistenceCheckPort>,
        store: Arc<dyn KeyValueStorePort>,
        clock: Arc<dyn ClockPort>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            probe: ProviderProbe::new(checker, config.probe_timeout),
            cache: PreferenceCache::new(store, clock, config.freshness_window),
        }
    }

    /// Returns the preference cache.
    #[must_use]
    pub const fn cache(&self) -> &PreferenceCache {
        &self.cache
    }

    /// Resolves an avatar request.
    pub async fn resolve(&self, request: &AvatarRequest) -> ResolvedAvatar {
        let player_id = &request.player_id;
        let preferred = self.cache.get(player_id).await;
        let candidates = candidate_order(preferred);

        debug!(
            player = %player_id,
            preferred = ?preferred.map(AvatarProvider::name),
            "Probing avatar providers"
        );

        let probes = candidates.iter().map(|&provider| {
            self.probe
                .probe(provider, player_id, request.size, request.overlay)
        });
        let results = join_all(probes).await;

        let winner = candidates
            .into_iter()
            .zip(results)
            .find_map(|(provider, url)| url.map(|url| (provider, url)));

        if let Some((provider, url)) = winner {
            self.cache.set(player_id, provider).await;
            info!(player = %player_id, provider = %provider, "Resolved avatar");
            ResolvedAvatar::from_provider(provider, url)
        } else {
            info!(player = %player_id, "No avatar provider usable, using placeholder");
            ResolvedAvatar::placeholder(generate_placeholder(&request.label, request.size))
        }
    }

    /// Resolves straight to a URL.
    pub async fn resolve_url(
        &self,
        player_id: impl Into<PlayerId>,
        label: &str,
        size: u32,
        overlay: bool,
    ) -> String {
        let request = AvatarRequest::new(player_id, label, size, overlay);
        self.resolve(&request).await.into_url()
    }

    /// Aborts all outstanding provider checks. Later resolutions fall back
    /// to placeholders.
    pub fn shutdown(&self) {
        debug!("Shutting down avatar resolver");
        self.probe.shutdown();
    }
}

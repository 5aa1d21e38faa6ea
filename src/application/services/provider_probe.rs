//! Single-provider existence probe with a hard deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::domain::entities::{AvatarProvider, PlayerId};
use crate::domain::errors::ProbeError;
use crate::domain::ports::ExistenceCheckPort;

/// Default deadline for one existence check.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a cancelled check may take to wind down before it is dropped.
const CANCEL_GRACE: Duration = Duration::from_millis(50);

/// Checks whether a provider can serve an avatar.
///
/// Every probe gets its own cancellation token, a child of the probe's root
/// token. The token is cancelled when the deadline passes. The check then
/// gets a short grace period to observe the cancellation and is dropped if
/// it has not finished, so a probe never outlasts its deadline by more than
/// that grace.
pub struct ProviderProbe {
    checker: Arc<dyn ExistenceCheckPort>,
    timeout: Duration,
    root: CancellationToken,
}

impl std::fmt::Debug for ProviderProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderProbe")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ProviderProbe {
    /// Creates a probe with the given deadline.
    #[must_use]
    pub fn new(checker: Arc<dyn ExistenceCheckPort>, timeout: Duration) -> Self {
        Self {
            checker,
            timeout,
            root: CancellationToken::new(),
        }
    }

    /// Returns the per-probe deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Cancels every in-flight and future check.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    /// Probes one provider. Returns the candidate URL if it is usable.
    pub async fn probe(
        &self,
        provider: AvatarProvider,
        player_id: &PlayerId,
        size: u32,
        overlay: bool,
    ) -> Option<String> {
        let url = provider.build_url(player_id, size, overlay);
        trace!(provider = %provider, url = %url, "Probing avatar provider");

        match self.check_with_deadline(&url).await {
            Ok(()) => {
                debug!(provider = %provider, player = %player_id, "Provider usable");
                Some(url)
            }
            Err(e) => {
                debug!(provider = %provider, player = %player_id, error = %e, "Provider unusable");
                None
            }
        }
    }

    async fn check_with_deadline(&self, url: &str) -> Result<(), ProbeError> {
        let token = self.root.child_token();
        let mut check = self.checker.check(url, &token);
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        tokio::select! {
            result = &mut check => result,
            () = &mut deadline => {
                token.cancel();
                if tokio::time::timeout(CANCEL_GRACE, check).await.is_err() {
                    debug!(url = %url, "Check ignored cancellation, dropping it");
                }
                Err(ProbeError::timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockOutcome, RecordingExistenceCheck};

    fn steve() -> PlayerId {
        PlayerId::new("abc-123")
    }

    #[tokio::test]
    async fn test_usable_provider_returns_url() {
        let checker = Arc::new(
            RecordingExistenceCheck::new().with(AvatarProvider::Minotar, MockOutcome::Usable),
        );
        let probe = ProviderProbe::new(checker.clone(), DEFAULT_PROBE_TIMEOUT);

        let url = probe.probe(AvatarProvider::Minotar, &steve(), 64, true).await;

        assert_eq!(
            url.as_deref(),
            Some("https://minotar.net/helm/abc-123/64.png")
        );
        assert_eq!(checker.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unusable_provider_returns_none() {
        let checker = Arc::new(RecordingExistenceCheck::new());
        let probe = ProviderProbe::new(checker, DEFAULT_PROBE_TIMEOUT);

        let url = probe.probe(AvatarProvider::Crafatar, &steve(), 64, true).await;

        assert!(url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_cancels_check() {
        let checker = Arc::new(
            RecordingExistenceCheck::new().with(AvatarProvider::McHeads, MockOutcome::Hang),
        );
        let probe = ProviderProbe::new(checker.clone(), DEFAULT_PROBE_TIMEOUT);

        let started = tokio::time::Instant::now();
        let url = probe.probe(AvatarProvider::McHeads, &steve(), 64, true).await;

        assert!(url.is_none());
        assert_eq!(checker.cancellations(), 1);
        assert!(started.elapsed() >= DEFAULT_PROBE_TIMEOUT);
        assert!(started.elapsed() < DEFAULT_PROBE_TIMEOUT + Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_ignoring_cancellation_is_dropped_after_deadline() {
        let checker = Arc::new(RecordingExistenceCheck::new().with(
            AvatarProvider::Crafatar,
            MockOutcome::IgnoresCancel(Duration::from_secs(30)),
        ));
        let probe = ProviderProbe::new(checker.clone(), DEFAULT_PROBE_TIMEOUT);

        let started = tokio::time::Instant::now();
        let url = probe.probe(AvatarProvider::Crafatar, &steve(), 64, true).await;

        assert!(url.is_none());
        assert!(started.elapsed() >= DEFAULT_PROBE_TIMEOUT);
        assert!(started.elapsed() < DEFAULT_PROBE_TIMEOUT + Duration::from_millis(100));
        assert_eq!(checker.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_but_in_time_is_usable() {
        let checker = Arc::new(RecordingExistenceCheck::new().with(
            AvatarProvider::Crafatar,
            MockOutcome::UsableAfter(Duration::from_millis(2900)),
        ));
        let probe = ProviderProbe::new(checker.clone(), DEFAULT_PROBE_TIMEOUT);

        let url = probe.probe(AvatarProvider::Crafatar, &steve(), 64, false).await;

        assert!(url.is_some());
        assert_eq!(checker.cancellations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_check() {
        let checker = Arc::new(
            RecordingExistenceCheck::new().with(AvatarProvider::Minotar, MockOutcome::Hang),
        );
        let probe = Arc::new(ProviderProbe::new(checker.clone(), Duration::from_secs(60)));

        let task = {
            let probe = probe.clone();
            tokio::spawn(async move {
                probe
                    .probe(AvatarProvider::Minotar, &PlayerId::new("abc-123"), 64, true)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        probe.shutdown();

        let started = tokio::time::Instant::now();
        assert!(task.await.unwrap().is_none());
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(checker.cancellations(), 1);
    }
}

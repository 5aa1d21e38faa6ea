//! Non-blocking avatar loading for UI callers.
//!
//! A request spawns the resolution on the runtime and hands back a ticket.
//! The resolution always runs to completion so the preference cache learns
//! from it; the result is only delivered if the ticket is still live.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::application::use_cases::AvatarResolver;
use crate::domain::entities::{AvatarRequest, ResolvedAvatar};

/// Message sent when an avatar finishes resolving.
#[derive(Debug, Clone)]
pub struct AvatarResolvedEvent {
    /// Ticket the result belongs to.
    pub ticket_id: Uuid,
    /// The original request.
    pub request: AvatarRequest,
    /// The resolved avatar.
    pub avatar: ResolvedAvatar,
}

/// Caller-side handle for a pending resolution.
///
/// Cancelling (or dropping) the ticket suppresses delivery of the result.
/// It does not abort the provider probes.
#[derive(Debug)]
#[must_use = "dropping a ticket cancels delivery of its result"]
pub struct AvatarTicket {
    id: Uuid,
    cancelled: Arc<AtomicBool>,
}

impl AvatarTicket {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the ticket id carried by the matching event.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Stops the result from being delivered.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for AvatarTicket {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawns avatar resolutions and reports results over a channel.
pub struct AvatarLoader {
    resolver: Arc<AvatarResolver>,
    event_tx: mpsc::UnboundedSender<AvatarResolvedEvent>,
    pending: Arc<AtomicUsize>,
}

impl std::fmt::Debug for AvatarLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarLoader")
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl AvatarLoader {
    /// Creates a loader delivering results to `event_tx`.
    #[must_use]
    pub fn new(
        resolver: Arc<AvatarResolver>,
        event_tx: mpsc::UnboundedSender<AvatarResolvedEvent>,
    ) -> Self {
        Self {
            resolver,
            event_tx,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Starts resolving an avatar in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn request(&self, request: AvatarRequest) -> AvatarTicket {
        let ticket = AvatarTicket::new();
        let ticket_id = ticket.id;
        let cancelled = ticket.cancelled.clone();
        let resolver = self.resolver.clone();
        let event_tx = self.event_tx.clone();
        let pending = self.pending.clone();

        pending.fetch_add(1, Ordering::SeqCst);
        trace!(ticket = %ticket_id, player = %request.player_id, "Queued avatar resolution");

        tokio::spawn(async move {
            let avatar = resolver.resolve(&request).await;
            pending.fetch_sub(1, Ordering::SeqCst);

            if cancelled.load(Ordering::Acquire) {
                debug!(
                    ticket = %ticket_id,
                    player = %request.player_id,
                    "Discarding avatar for cancelled ticket"
                );
                return;
            }

            let event = AvatarResolvedEvent {
                ticket_id,
                request,
                avatar,
            };
            if event_tx.send(event).is_err() {
                debug!(ticket = %ticket_id, "Avatar event receiver dropped");
            }
        });

        ticket
    }

    /// Returns the number of resolutions still running.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::use_cases::ResolverConfig;
    use crate::domain::entities::{AvatarProvider, PlayerId};
    use crate::domain::ports::mocks::{FixedClock, MockOutcome, RecordingExistenceCheck};
    use crate::infrastructure::storage::MemoryStore;

    fn loader_with(
        checker: RecordingExistenceCheck,
    ) -> (
        AvatarLoader,
        Arc<AvatarResolver>,
        mpsc::UnboundedReceiver<AvatarResolvedEvent>,
    ) {
        let resolver = Arc::new(AvatarResolver::new(
            Arc::new(checker),
            Arc::new(MemoryStore::new()),
            Arc::new(FixedClock::default()),
            ResolverConfig::default(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        (AvatarLoader::new(resolver.clone(), tx), resolver, rx)
    }

    #[tokio::test]
    async fn test_result_delivered_to_live_ticket() {
        let (loader, _resolver, mut rx) = loader_with(
            RecordingExistenceCheck::new().with(AvatarProvider::Crafatar, MockOutcome::Usable),
        );

        let ticket = loader.request(AvatarRequest::new("abc-123", "Steve", 64, true));
        let event = rx.recv().await.unwrap();

        assert_eq!(event.ticket_id, ticket.id());
        assert_eq!(event.avatar.source.provider(), Some(AvatarProvider::Crafatar));
        assert_eq!(loader.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_ticket_gets_nothing_but_cache_learns() {
        let (loader, resolver, mut rx) = loader_with(RecordingExistenceCheck::new().with(
            AvatarProvider::McHeads,
            MockOutcome::UsableAfter(Duration::from_millis(500)),
        ));

        let ticket = loader.request(AvatarRequest::new("abc-123", "Steve", 64, true));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(loader.pending_count(), 1);
        ticket.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(loader.pending_count(), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            resolver.cache().get(&PlayerId::new("abc-123")).await,
            Some(AvatarProvider::McHeads)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_ticket_is_cancelled() {
        let (loader, _resolver, mut rx) = loader_with(RecordingExistenceCheck::new().with(
            AvatarProvider::Minotar,
            MockOutcome::UsableAfter(Duration::from_millis(500)),
        ));

        drop(loader.request(AvatarRequest::new("abc-123", "Steve", 64, true)));
        let kept = loader.request(AvatarRequest::new("def-456", "Alex", 32, false));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.ticket_id, kept.id());
        assert_eq!(event.request.player_id, PlayerId::new("def-456"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}

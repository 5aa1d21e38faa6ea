//! Port definition for provider existence checks.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::ProbeError;

/// Port for checking that a candidate avatar URL is servable.
///
/// Implementations must stop work promptly once `cancel` fires and report
/// [`ProbeError::Cancelled`].
#[async_trait]
pub trait ExistenceCheckPort: Send + Sync {
    /// Returns `Ok(())` if the URL answered with a success status.
    async fn check(&self, url: &str, cancel: &CancellationToken) -> Result<(), ProbeError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::domain::entities::AvatarProvider;

    /// Canned behavior for one provider.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockOutcome {
        /// Answers immediately with success.
        Usable,
        /// Answers immediately with a 404.
        Unusable,
        /// Answers with success after a delay.
        UsableAfter(Duration),
        /// Never answers until cancelled.
        Hang,
        /// Answers with a 404 after a delay, without watching the token.
        IgnoresCancel(Duration),
    }

    /// Existence checker that records call order and returns canned outcomes.
    pub struct RecordingExistenceCheck {
        outcomes: Mutex<HashMap<AvatarProvider, MockOutcome>>,
        calls: Arc<Mutex<Vec<String>>>,
        cancellations: AtomicUsize,
    }

    impl RecordingExistenceCheck {
        /// Creates a checker where every provider is unusable.
        pub fn new() -> Self {
            Self {
                outcomes: Mutex::new(HashMap::new()),
                calls: Arc::new(Mutex::new(Vec::new())),
                cancellations: AtomicUsize::new(0),
            }
        }

        /// Sets the outcome for a provider.
        pub fn with(self, provider: AvatarProvider, outcome: MockOutcome) -> Self {
            self.set(provider, outcome);
            self
        }

        /// Changes the outcome for a provider.
        pub fn set(&self, provider: AvatarProvider, outcome: MockOutcome) {
            self.outcomes.lock().insert(provider, outcome);
        }

        /// URLs checked so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        /// Clears recorded calls.
        pub fn reset_calls(&self) {
            self.calls.lock().clear();
        }

        /// Number of checks that observed cancellation.
        pub fn cancellations(&self) -> usize {
            self.cancellations.load(Ordering::SeqCst)
        }

        fn outcome_for(&self, url: &str) -> MockOutcome {
            let outcomes = self.outcomes.lock();
            AvatarProvider::ALL
                .into_iter()
                .find(|provider| url.contains(provider.host()))
                .and_then(|provider| outcomes.get(&provider).copied())
                .unwrap_or(MockOutcome::Unusable)
        }
    }

    impl Default for RecordingExistenceCheck {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ExistenceCheckPort for RecordingExistenceCheck {
        async fn check(&self, url: &str, cancel: &CancellationToken) -> Result<(), ProbeError> {
            self.calls.lock().push(url.to_string());

            match self.outcome_for(url) {
                MockOutcome::Usable => Ok(()),
                MockOutcome::Unusable => Err(ProbeError::status(404)),
                MockOutcome::UsableAfter(delay) => {
                    tokio::select! {
                        () = tokio::time::sleep(delay) => Ok(()),
                        () = cancel.cancelled() => {
                            self.cancellations.fetch_add(1, Ordering::SeqCst);
                            Err(ProbeError::Cancelled)
                        }
                    }
                }
                MockOutcome::Hang => {
                    cancel.cancelled().await;
                    self.cancellations.fetch_add(1, Ordering::SeqCst);
                    Err(ProbeError::Cancelled)
                }
                MockOutcome::IgnoresCancel(delay) => {
                    tokio::time::sleep(delay).await;
                    Err(ProbeError::status(404))
                }
            }
        }
    }
}

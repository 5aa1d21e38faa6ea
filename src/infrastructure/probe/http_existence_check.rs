//! HTTP `HEAD` existence checks against avatar providers.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::domain::errors::ProbeError;
use crate::domain::ports::ExistenceCheckPort;

const USER_AGENT: &str = concat!("avatar-resolver/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP checker.
#[derive(Debug, Clone)]
pub struct HttpCheckConfig {
    /// Transport-level request timeout. The probe deadline is enforced
    /// separately through cancellation.
    pub request_timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
}

impl Default for HttpCheckConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

/// Existence checker issuing `HEAD` requests.
#[derive(Debug, Clone)]
pub struct HttpExistenceCheck {
    client: reqwest::Client,
}

impl HttpExistenceCheck {
    /// Creates a checker with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &HttpCheckConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ProbeError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Creates a checker around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExistenceCheckPort for HttpExistenceCheck {
    async fn check(&self, url: &str, cancel: &CancellationToken) -> Result<(), ProbeError> {
        let request = self.client.head(url).send();

        let response = tokio::select! {
            () = cancel.cancelled() => {
                trace!(url = %url, "Existence check cancelled");
                return Err(ProbeError::Cancelled);
            }
            response = request => {
                response.map_err(|e| ProbeError::network(e.to_string()))?
            }
        };

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeError::status(status.as_u16()))
        }
    }
}

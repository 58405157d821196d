//! Mock Status Fetcher
//!
//! For tests and local development without a remote service.

use async_trait::async_trait;

use memberships_core::error::{MembershipsError, Result};
use memberships_core::model::ConnectionStatus;

use crate::client::StatusFetcher;

enum MockOutcome {
    Status(ConnectionStatus),
    MissingToken,
    Unavailable,
    MalformedBody,
}

/// Status fetcher with a fixed outcome
pub struct MockStatusFetcher {
    outcome: MockOutcome,
}

impl MockStatusFetcher {
    /// Always resolve to the given status
    pub fn connected(status: ConnectionStatus) -> Self {
        Self {
            outcome: MockOutcome::Status(status),
        }
    }

    /// Behave like a site whose user never connected
    pub fn missing_token() -> Self {
        Self {
            outcome: MockOutcome::MissingToken,
        }
    }

    /// Behave like an unreachable or timed-out remote service
    pub fn unavailable() -> Self {
        Self {
            outcome: MockOutcome::Unavailable,
        }
    }

    /// Behave like a remote service violating the wire contract
    pub fn malformed_body() -> Self {
        Self {
            outcome: MockOutcome::MalformedBody,
        }
    }
}

#[async_trait]
impl StatusFetcher for MockStatusFetcher {
    async fn fetch_status(&self, _site_id: u64) -> Result<ConnectionStatus> {
        match &self.outcome {
            MockOutcome::Status(status) => Ok(status.clone()),
            MockOutcome::MissingToken => Err(MembershipsError::MissingToken),
            MockOutcome::Unavailable => Err(MembershipsError::RemoteUnavailable(
                "status request timed out".into(),
            )),
            MockOutcome::MalformedBody => {
                Err(MembershipsError::DecodeFailure("empty body".into()))
            }
        }
    }
}

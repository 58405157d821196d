//! Status Resolution
//!
//! Dispatches membership status lookups by deployment topology: the
//! authoritative side reads its own store, the connected side asks the
//! remote service.

use std::sync::Arc;

use memberships_core::error::Result;
use memberships_core::model::{ConnectionStatus, DeploymentMode, SiteIdentity};
use memberships_core::status::StatusStore;

use crate::client::StatusFetcher;

/// Resolves membership/connection status for a site.
///
/// No caching: account connections change out-of-band, so every call
/// re-resolves.
pub struct StatusResolver {
    store: Arc<dyn StatusStore>,
    fetcher: Arc<dyn StatusFetcher>,
}

impl StatusResolver {
    pub fn new(store: Arc<dyn StatusStore>, fetcher: Arc<dyn StatusFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Resolve the current status for the given site identity.
    ///
    /// Exactly one of status or typed error per call, never both.
    pub async fn resolve(&self, identity: &SiteIdentity) -> Result<ConnectionStatus> {
        match identity.deployment_mode {
            DeploymentMode::Authoritative => {
                // Local reads cannot fail; an unknown site is an empty status.
                tracing::debug!(site_id = identity.site_id, "Resolving status locally");
                Ok(self
                    .store
                    .status_for_site(identity.site_id)
                    .unwrap_or_default())
            }
            DeploymentMode::ConnectedClient => {
                tracing::debug!(site_id = identity.site_id, "Resolving status remotely");
                self.fetcher.fetch_status(identity.site_id).await
            }
        }
    }
}

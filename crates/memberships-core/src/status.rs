//! Local Status Store
//!
//! Authoritative-side storage of per-site membership status. Local reads
//! cannot fail; an unknown site simply has no recorded status.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::ConnectionStatus;

/// Status storage trait for the authoritative deployment
pub trait StatusStore: Send + Sync {
    /// Status for a site, if one has been recorded
    fn status_for_site(&self, site_id: u64) -> Option<ConnectionStatus>;
}

/// In-memory status store (for development and tests)
pub struct MemoryStatusStore {
    statuses: RwLock<HashMap<u64, ConnectionStatus>>,
}

impl Default for MemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self {
            statuses: RwLock::new(HashMap::new()),
        }
    }

    /// Record the status for a site, replacing any previous one
    pub fn set_status(&self, site_id: u64, status: ConnectionStatus) {
        self.statuses.write().unwrap().insert(site_id, status);
    }
}

impl StatusStore for MemoryStatusStore {
    fn status_for_site(&self, site_id: u64) -> Option<ConnectionStatus> {
        self.statuses.read().unwrap().get(&site_id).cloned()
    }
}

//! Application State

use std::sync::Arc;

use memberships_core::model::SiteIdentity;
use memberships_core::plans::MemoryPlanRepository;
use memberships_core::registrar::{CapabilityHost, RenderCallback, UnavailableReason};
use memberships_connect::StatusResolver;

/// What the registration cycle decided about the purchase button
#[derive(Clone)]
pub enum ButtonCapability {
    /// Capability registered; requests go through the render callback
    Enabled(RenderCallback),
    /// Capability suppressed; requests get the upgrade reason
    Unavailable(UnavailableReason),
}

/// Minimal host-platform registration surface.
///
/// Remembers what the registrar decided so the router can serve it.
#[derive(Default)]
pub struct HostPlatform {
    button: Option<ButtonCapability>,
}

impl HostPlatform {
    /// The recorded capability, if a registration cycle ran
    pub fn into_capability(self) -> Option<ButtonCapability> {
        self.button
    }
}

impl CapabilityHost for HostPlatform {
    fn register_capability(&mut self, name: &str, renderer: RenderCallback) {
        tracing::debug!(capability = name, "Host registered capability");
        self.button = Some(ButtonCapability::Enabled(renderer));
    }

    fn set_capability_unavailable(&mut self, name: &str, reason: UnavailableReason) {
        tracing::debug!(capability = name, "Host marked capability unavailable");
        self.button = Some(ButtonCapability::Unavailable(reason));
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Identity of this deployment
    pub identity: SiteIdentity,

    /// Plan repository
    pub plans: Arc<MemoryPlanRepository>,

    /// Deployment-aware status resolver
    pub resolver: Arc<StatusResolver>,

    /// Registration-cycle outcome for the purchase button
    pub button: ButtonCapability,
}

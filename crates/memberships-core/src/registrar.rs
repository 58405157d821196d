//! Feature Registrar
//!
//! One-shot registration-cycle decision: expose the purchase-button
//! capability to the host platform, or mark it unavailable with a
//! structured upgrade reason. The decision is computed at most once per
//! process lifetime and is not persisted.

use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::button::{ButtonRenderRequest, RenderOutcome};
use crate::entitlement::{self, RECURRING_PAYMENTS_FEATURE, SitePlanLookup};
use crate::model::SiteIdentity;

/// Client-side assets the interactive button needs the host to load.
///
/// A registration effect, not a data dependency of the render contract.
pub fn required_assets() -> &'static [&'static str] {
    &["checkout-overlay", "polyfill"]
}

/// Render callback handed to the host platform
pub type RenderCallback = Arc<dyn Fn(&ButtonRenderRequest) -> RenderOutcome + Send + Sync>;

/// Structured reason reported when the capability is suppressed
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnavailableReason {
    /// Stable reason code
    pub code: &'static str,

    /// Feature the site is missing
    pub required_feature: &'static str,

    /// Minimum plan tier that would unlock it
    pub required_plan: &'static str,
}

/// Terminal state of one registration cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    /// Capability registered, render callback attached
    Exposed,
    /// Capability advertised as unavailable with an upgrade reason
    Suppressed(UnavailableReason),
}

/// Host platform registration surface.
///
/// The core only supplies the capability name, render callback, and
/// unavailable descriptor; the registration mechanism is the host's.
pub trait CapabilityHost {
    /// Register a capability with its render callback
    fn register_capability(&mut self, name: &str, renderer: RenderCallback);

    /// Mark a capability unavailable so the host can show an upgrade prompt
    fn set_capability_unavailable(&mut self, name: &str, reason: UnavailableReason);
}

/// Decides once per process whether the purchase button is exposed.
///
/// Identity and entitlement signals are passed in at construction; there
/// is no hidden static state.
pub struct FeatureRegistrar {
    identity: SiteIdentity,
    lookup: Arc<dyn SitePlanLookup>,
    decision: OnceLock<Registration>,
}

impl FeatureRegistrar {
    pub fn new(identity: SiteIdentity, lookup: Arc<dyn SitePlanLookup>) -> Self {
        Self {
            identity,
            lookup,
            decision: OnceLock::new(),
        }
    }

    /// The registration decision, computed on first access and fixed for
    /// the life of this registrar.
    pub fn decision(&self) -> &Registration {
        self.decision.get_or_init(|| {
            if entitlement::is_feature_enabled(&self.identity, self.lookup.as_ref()) {
                Registration::Exposed
            } else {
                Registration::Suppressed(UnavailableReason {
                    code: "missing_plan",
                    required_feature: "memberships",
                    required_plan: entitlement::minimum_tier(self.identity.deployment_mode),
                })
            }
        })
    }

    /// Apply the decision to the host platform
    pub fn apply<H: CapabilityHost>(&self, host: &mut H, renderer: RenderCallback) {
        match self.decision() {
            Registration::Exposed => {
                tracing::info!(
                    capability = RECURRING_PAYMENTS_FEATURE,
                    assets = ?required_assets(),
                    "Registering purchase button"
                );
                host.register_capability(RECURRING_PAYMENTS_FEATURE, renderer);
            }
            Registration::Suppressed(reason) => {
                tracing::info!(
                    capability = RECURRING_PAYMENTS_FEATURE,
                    required_plan = reason.required_plan,
                    "Purchase button unavailable"
                );
                host.set_capability_unavailable(RECURRING_PAYMENTS_FEATURE, reason.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeploymentMode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLookup {
        enabled: bool,
        calls: AtomicUsize,
    }

    impl SitePlanLookup for CountingLookup {
        fn has_any_tier(&self, _site_id: u64, _tiers: &[&str]) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.enabled
        }

        fn connection_active(&self) -> bool {
            true
        }

        fn supports_feature(&self, _feature: &str) -> bool {
            self.enabled
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        registered: Option<String>,
        unavailable: Option<(String, UnavailableReason)>,
    }

    impl CapabilityHost for RecordingHost {
        fn register_capability(&mut self, name: &str, _renderer: RenderCallback) {
            self.registered = Some(name.to_string());
        }

        fn set_capability_unavailable(&mut self, name: &str, reason: UnavailableReason) {
            self.unavailable = Some((name.to_string(), reason));
        }
    }

    fn registrar(enabled: bool) -> FeatureRegistrar {
        FeatureRegistrar::new(
            SiteIdentity {
                site_id: 1,
                deployment_mode: DeploymentMode::Authoritative,
            },
            Arc::new(CountingLookup {
                enabled,
                calls: AtomicUsize::new(0),
            }),
        )
    }

    fn noop_callback() -> RenderCallback {
        Arc::new(|_request| RenderOutcome::NoRender)
    }

    #[test]
    fn test_enabled_site_exposes_capability() {
        let registrar = registrar(true);
        let mut host = RecordingHost::default();
        registrar.apply(&mut host, noop_callback());

        assert_eq!(registrar.decision(), &Registration::Exposed);
        assert_eq!(host.registered.as_deref(), Some(RECURRING_PAYMENTS_FEATURE));
        assert!(host.unavailable.is_none());
    }

    #[test]
    fn test_disabled_site_suppresses_with_reason() {
        let registrar = registrar(false);
        let mut host = RecordingHost::default();
        registrar.apply(&mut host, noop_callback());

        assert!(host.registered.is_none());
        let (name, reason) = host.unavailable.unwrap();
        assert_eq!(name, RECURRING_PAYMENTS_FEATURE);
        assert_eq!(reason.code, "missing_plan");
        assert_eq!(reason.required_feature, "memberships");
        assert_eq!(reason.required_plan, "premium-bundle");
    }

    #[test]
    fn test_decision_is_made_once() {
        let lookup = Arc::new(CountingLookup {
            enabled: true,
            calls: AtomicUsize::new(0),
        });
        let registrar = FeatureRegistrar::new(
            SiteIdentity {
                site_id: 1,
                deployment_mode: DeploymentMode::Authoritative,
            },
            lookup.clone(),
        );

        assert_eq!(registrar.decision(), &Registration::Exposed);
        assert_eq!(registrar.decision(), &Registration::Exposed);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}

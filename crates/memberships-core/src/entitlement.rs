//! Entitlement Gate
//!
//! Decides whether the recurring-payments capability is available for a
//! site. The gate never fails: absence of a qualifying signal means the
//! capability is disabled.

use crate::model::{DeploymentMode, SiteIdentity};

/// Capability name checked against the site plan on the connected side
pub const RECURRING_PAYMENTS_FEATURE: &str = "recurring-payments";

/// Tier markers that qualify a site on the authoritative side
pub const QUALIFYING_TIERS: &[&str] = &["premium", "business", "ecommerce"];

/// Entitlement signals for the current site.
///
/// Implementations answer from whatever the hosting side knows: tier
/// markers on the authoritative side, connection state and plan
/// capabilities on the connected side.
pub trait SitePlanLookup: Send + Sync {
    /// Whether the site carries any of the given tier markers
    fn has_any_tier(&self, site_id: u64, tiers: &[&str]) -> bool;

    /// Whether the connection to the remote service is active
    fn connection_active(&self) -> bool;

    /// Whether the site plan supports a named capability
    fn supports_feature(&self, feature: &str) -> bool;
}

/// Whether recurring payments are enabled for the site.
///
/// Evaluated once per registration cycle, not per render.
pub fn is_feature_enabled(identity: &SiteIdentity, lookup: &dyn SitePlanLookup) -> bool {
    match identity.deployment_mode {
        DeploymentMode::Authoritative => lookup.has_any_tier(identity.site_id, QUALIFYING_TIERS),
        DeploymentMode::ConnectedClient => {
            lookup.connection_active() && lookup.supports_feature(RECURRING_PAYMENTS_FEATURE)
        }
    }
}

/// Minimum plan tier to advertise in an upgrade prompt.
///
/// The tier vocabulary differs per topology.
pub fn minimum_tier(mode: DeploymentMode) -> &'static str {
    match mode {
        DeploymentMode::Authoritative => "premium-bundle",
        DeploymentMode::ConnectedClient => "premium",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLookup {
        tiers: Vec<String>,
        connected: bool,
        features: Vec<String>,
    }

    impl SitePlanLookup for FakeLookup {
        fn has_any_tier(&self, _site_id: u64, tiers: &[&str]) -> bool {
            tiers.iter().any(|tier| self.tiers.iter().any(|t| t == tier))
        }

        fn connection_active(&self) -> bool {
            self.connected
        }

        fn supports_feature(&self, feature: &str) -> bool {
            self.features.iter().any(|f| f == feature)
        }
    }

    fn identity(mode: DeploymentMode) -> SiteIdentity {
        SiteIdentity {
            site_id: 1,
            deployment_mode: mode,
        }
    }

    #[test]
    fn test_authoritative_requires_qualifying_tier() {
        let premium = FakeLookup {
            tiers: vec!["premium".into()],
            connected: false,
            features: vec![],
        };
        assert!(is_feature_enabled(
            &identity(DeploymentMode::Authoritative),
            &premium
        ));

        let free = FakeLookup {
            tiers: vec!["free".into()],
            connected: false,
            features: vec![],
        };
        assert!(!is_feature_enabled(
            &identity(DeploymentMode::Authoritative),
            &free
        ));
    }

    #[test]
    fn test_connected_requires_connection_and_capability() {
        let enabled = FakeLookup {
            tiers: vec![],
            connected: true,
            features: vec![RECURRING_PAYMENTS_FEATURE.into()],
        };
        assert!(is_feature_enabled(
            &identity(DeploymentMode::ConnectedClient),
            &enabled
        ));

        let disconnected = FakeLookup {
            tiers: vec![],
            connected: false,
            features: vec![RECURRING_PAYMENTS_FEATURE.into()],
        };
        assert!(!is_feature_enabled(
            &identity(DeploymentMode::ConnectedClient),
            &disconnected
        ));

        let unsupported = FakeLookup {
            tiers: vec![],
            connected: true,
            features: vec!["simple-payments".into()],
        };
        assert!(!is_feature_enabled(
            &identity(DeploymentMode::ConnectedClient),
            &unsupported
        ));
    }

    #[test]
    fn test_minimum_tier_per_mode() {
        assert_eq!(minimum_tier(DeploymentMode::Authoritative), "premium-bundle");
        assert_eq!(minimum_tier(DeploymentMode::ConnectedClient), "premium");
    }
}

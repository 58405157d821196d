//! Server Configuration
//!
//! Resolved once at startup from the environment and passed by reference
//! into the registrar and resolver; no hidden globals.

use memberships_core::RendererConfig;
use memberships_core::entitlement::SitePlanLookup;
use memberships_core::model::{DeploymentMode, SiteIdentity};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Site this instance serves
    pub site_id: u64,

    /// Deployment topology
    pub deployment_mode: DeploymentMode,

    /// Locale emitted on rendered buttons
    pub locale: String,

    /// Default button label
    pub default_label: String,

    /// Attribution line for the checkout overlay
    pub powered_by_text: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            site_id: 1,
            deployment_mode: DeploymentMode::Authoritative,
            locale: "en".into(),
            default_label: "Your contribution".into(),
            powered_by_text: "Powered by Memberships".into(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let deployment_mode = match std::env::var("DEPLOYMENT_MODE") {
            Ok(raw) => DeploymentMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown DEPLOYMENT_MODE, staying authoritative");
                DeploymentMode::Authoritative
            }),
            Err(_) => defaults.deployment_mode,
        };

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            site_id: std::env::var("SITE_ID")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.site_id),
            deployment_mode,
            locale: std::env::var("SITE_LOCALE").unwrap_or(defaults.locale),
            default_label: std::env::var("BUTTON_LABEL").unwrap_or(defaults.default_label),
            powered_by_text: std::env::var("POWERED_BY_TEXT").unwrap_or(defaults.powered_by_text),
        }
    }

    /// Identity of this deployment
    pub fn identity(&self) -> SiteIdentity {
        SiteIdentity {
            site_id: self.site_id,
            deployment_mode: self.deployment_mode,
        }
    }

    /// Renderer configuration derived from this server configuration
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            site_id: self.site_id,
            locale: self.locale.clone(),
            default_label: self.default_label.clone(),
            powered_by_text: self.powered_by_text.clone(),
            ..RendererConfig::default()
        }
    }
}

/// Entitlement signals sourced from the environment.
///
/// Tier markers and plan capabilities are whatever the operator declared;
/// connection state is whether a user token is configured.
pub struct EnvPlanLookup {
    tiers: Vec<String>,
    features: Vec<String>,
    connected: bool,
}

impl EnvPlanLookup {
    /// Create from environment variables
    pub fn from_env(connected: bool) -> Self {
        Self {
            tiers: csv_env("SITE_TIERS"),
            features: csv_env("SITE_FEATURES"),
            connected,
        }
    }
}

impl SitePlanLookup for EnvPlanLookup {
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

fn csv_env(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|raw| {
            raw.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.deployment_mode, DeploymentMode::Authoritative);
        assert_eq!(config.identity().site_id, 1);
    }

    #[test]
    fn test_renderer_config_carries_site_identity() {
        let config = ServerConfig {
            site_id: 42,
            locale: "de".into(),
            ..ServerConfig::default()
        };

        let renderer = config.renderer_config();
        assert_eq!(renderer.site_id, 42);
        assert_eq!(renderer.locale, "de");
        assert_eq!(renderer.css_class_prefix, "memberships");
    }
}

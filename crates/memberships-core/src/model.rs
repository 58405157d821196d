//! Domain Models
//!
//! Core data types for membership plans and site status.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record kind tag carried by membership plan records.
///
/// Repositories store records of several kinds; only records tagged with
/// this kind may be read as plans.
pub const PLAN_RECORD_KIND: &str = "memberships_plan";

/// Identifier of a plan record, assigned by the repository at creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(u64);

impl PlanId {
    /// Wrap a raw id. Zero is not a valid id.
    pub fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Parse an untrusted attribute value.
    ///
    /// Non-numeric, negative, and zero input all yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().and_then(Self::new)
    }

    /// Get the raw id
    pub fn get(self) -> u64 {
        self.0
    }

    /// Repository-internal constructor; id allocation never yields zero
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication status of a plan record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Draft,
    Published,
    Trashed,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Published => "published",
            PlanStatus::Trashed => "trashed",
        }
    }
}

/// A raw content record as the repository stores it.
///
/// Plan fields live in `meta` under the keys declared by
/// [`crate::plans::plan_field_mapping`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Record id
    pub id: PlanId,

    /// Kind tag; only [`PLAN_RECORD_KIND`] records decode into plans
    pub kind: String,

    /// Publication status
    pub status: PlanStatus,

    /// Display title
    pub title: String,

    /// Storage metadata
    pub meta: BTreeMap<String, String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    /// Whether this record is tagged as a membership plan
    pub fn is_plan(&self) -> bool {
        self.kind == PLAN_RECORD_KIND
    }
}

/// A subscription plan, decoded from a plan-kind content record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan id
    pub id: PlanId,

    /// Display name
    pub title: String,

    /// Recurring amount, non-negative
    pub price: Decimal,

    /// ISO-4217-like currency code
    pub currency: String,

    /// Publication status
    pub status: PlanStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Only published plans may be rendered
    pub fn is_renderable(&self) -> bool {
        self.status == PlanStatus::Published
    }
}

/// Deployment topology of the running instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// This instance is the source of truth for status and entitlement
    Authoritative,
    /// Status and entitlement come from a remote authoritative service
    ConnectedClient,
}

impl DeploymentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentMode::Authoritative => "authoritative",
            DeploymentMode::ConnectedClient => "connected_client",
        }
    }

    /// Parse a configuration value
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "authoritative" => Some(DeploymentMode::Authoritative),
            "connected" | "connected_client" => Some(DeploymentMode::ConnectedClient),
            _ => None,
        }
    }
}

/// Identity of the current deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteIdentity {
    /// Site id
    pub site_id: u64,

    /// Which status-resolution branch executes
    pub deployment_mode: DeploymentMode,
}

/// Summary of a plan as listed in a connection status
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Plan id
    pub id: PlanId,

    /// Display name
    pub title: String,

    /// Recurring amount
    pub price: Decimal,

    /// ISO-4217-like currency code
    pub currency: String,
}

/// Membership/connection status for a site.
///
/// Also the wire shape of the remote status endpoint body; every field is
/// optional on the wire, and the default value is the empty status.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Plans available to the site, in listing order
    #[serde(default)]
    pub products: Vec<PlanSummary>,

    /// Linked payment account, if one is connected
    #[serde(default)]
    pub connected_account_id: Option<String>,

    /// Where to send the operator to connect a payment account
    #[serde(default)]
    pub connect_url: Option<String>,

    /// Where to send the operator to upgrade the site plan
    #[serde(default)]
    pub upgrade_url: Option<String>,

    /// Whether the site plan is too low for memberships
    #[serde(default)]
    pub should_upgrade_to_access_memberships: bool,
}

impl ConnectionStatus {
    /// Whether a payment account is linked
    pub fn is_connected(&self) -> bool {
        self.connected_account_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_id_parsing() {
        assert_eq!(PlanId::parse("42"), PlanId::new(42));
        assert_eq!(PlanId::parse(" 7 "), PlanId::new(7));
        assert_eq!(PlanId::parse("0"), None);
        assert_eq!(PlanId::parse("-3"), None);
        assert_eq!(PlanId::parse("abc"), None);
        assert_eq!(PlanId::parse(""), None);
        assert_eq!(PlanId::parse("12.5"), None);
    }

    #[test]
    fn test_deployment_mode_parsing() {
        assert_eq!(
            DeploymentMode::parse("authoritative"),
            Some(DeploymentMode::Authoritative)
        );
        assert_eq!(
            DeploymentMode::parse("connected"),
            Some(DeploymentMode::ConnectedClient)
        );
        assert_eq!(
            DeploymentMode::parse("Connected_Client"),
            Some(DeploymentMode::ConnectedClient)
        );
        assert_eq!(DeploymentMode::parse("standalone"), None);
    }

    #[test]
    fn test_default_status_is_empty() {
        let status = ConnectionStatus::default();
        assert!(status.products.is_empty());
        assert!(!status.is_connected());
        assert!(!status.should_upgrade_to_access_memberships);
    }

    #[test]
    fn test_status_decodes_with_missing_fields() {
        let status: ConnectionStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status, ConnectionStatus::default());

        let status: ConnectionStatus =
            serde_json::from_str(r#"{"connected_account_id":"acct_1"}"#).unwrap();
        assert!(status.is_connected());
    }
}

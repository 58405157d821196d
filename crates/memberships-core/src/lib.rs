//! # memberships-core
//!
//! Core decision logic for the recurring-payments purchase button:
//! plan storage contracts, entitlement gating, and sanitized button
//! rendering from untrusted caller attributes.
//!
//! ## Components
//!
//! - **Plan repository** - stores plan records and resolves them by id;
//!   records of other kinds are never misread as plans
//! - **Entitlement gate** - whether the capability is available for the
//!   site, by tier markers or plan capabilities depending on topology
//! - **Button renderer** - pure read-and-render; every invalid request
//!   degrades to silent no-output so embedded buttons never break a page
//! - **Feature registrar** - one-shot per-process decision to expose or
//!   suppress the capability toward the host platform
//!
//! ## Usage
//!
//! ```rust,ignore
//! use memberships_core::{ButtonRenderer, ButtonRenderRequest, RendererConfig};
//!
//! let renderer = ButtonRenderer::new(RendererConfig {
//!     site_id: 42,
//!     ..RendererConfig::default()
//! });
//!
//! let request = ButtonRenderRequest {
//!     plan_id: Some("7".into()),
//!     ..ButtonRenderRequest::default()
//! };
//!
//! // Renders a sanitized fragment, or nothing at all.
//! let outcome = renderer.render(&request, &repository);
//! ```

pub mod button;
pub mod entitlement;
pub mod error;
pub mod escape;
pub mod model;
pub mod plans;
pub mod registrar;
pub mod status;

pub use button::{ButtonRenderRequest, ButtonRenderer, RenderOutcome, RendererConfig};
pub use entitlement::{RECURRING_PAYMENTS_FEATURE, SitePlanLookup, is_feature_enabled};
pub use error::{MembershipsError, Result};
pub use model::{
    ConnectionStatus, ContentRecord, DeploymentMode, Plan, PlanId, PlanStatus, PlanSummary,
    SiteIdentity,
};
pub use plans::{MemoryPlanRepository, NewPlan, PlanRepository};
pub use registrar::{CapabilityHost, FeatureRegistrar, Registration, UnavailableReason};
pub use status::{MemoryStatusStore, StatusStore};

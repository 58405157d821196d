//! memberships HTTP Server
//!
//! Axum boundary for the memberships system: resolves configuration,
//! runs the one-time registration cycle for the purchase button, and
//! serves status and render endpoints.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal_macros::dec;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memberships_core::button::ButtonRenderer;
use memberships_core::model::{ConnectionStatus, DeploymentMode, PlanStatus};
use memberships_core::plans::{MemoryPlanRepository, NewPlan, PlanRepository};
use memberships_core::registrar::{FeatureRegistrar, RenderCallback};
use memberships_core::status::MemoryStatusStore;
use memberships_connect::{RemoteConfig, RemoteStatusClient, StatusResolver};

use crate::config::{EnvPlanLookup, ServerConfig};
use crate::handlers::{health_check, list_plans, membership_status, render_button};
use crate::state::{AppState, HostPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    let identity = config.identity();
    tracing::info!(
        site_id = identity.site_id,
        mode = identity.deployment_mode.as_str(),
        "Resolved site identity"
    );

    // Status resolution: local store on the authoritative side, remote
    // client on the connected side.
    let remote = RemoteConfig::from_env();
    let has_token = remote.user_token.is_some();
    if identity.deployment_mode == DeploymentMode::ConnectedClient && !has_token {
        tracing::warn!("No user token configured - status requests will ask for reconnection");
    }
    let status_store = Arc::new(MemoryStatusStore::new());
    let resolver = Arc::new(StatusResolver::new(
        status_store.clone(),
        Arc::new(RemoteStatusClient::new(remote)),
    ));

    // Plan repository with a demo plan so renders work out of the box
    let plans = Arc::new(MemoryPlanRepository::new());
    let demo = plans.create_plan(NewPlan {
        title: "Monthly supporter".into(),
        price: dec!(5.00),
        currency: "USD".into(),
        status: PlanStatus::Published,
    });
    tracing::info!(plan_id = %demo, "Seeded demo plan");

    if identity.deployment_mode == DeploymentMode::Authoritative {
        // This instance is the source of truth: its status lists its own plans.
        status_store.set_status(
            identity.site_id,
            ConnectionStatus {
                products: plans.published_plans(),
                connected_account_id: std::env::var("PAYMENT_ACCOUNT_ID").ok(),
                ..ConnectionStatus::default()
            },
        );
    }

    let renderer = Arc::new(ButtonRenderer::new(config.renderer_config()));

    // One-time registration cycle
    let lookup = Arc::new(EnvPlanLookup::from_env(has_token));
    let registrar = FeatureRegistrar::new(identity, lookup);
    let callback: RenderCallback = {
        let plans = plans.clone();
        let renderer = renderer.clone();
        Arc::new(move |request| renderer.render(request, plans.as_ref()))
    };
    let mut host = HostPlatform::default();
    registrar.apply(&mut host, callback);
    let button = host
        .into_capability()
        .ok_or_else(|| anyhow::anyhow!("registration cycle made no decision"))?;

    let state = AppState {
        identity,
        plans,
        resolver,
        button,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(membership_status))
        .route("/api/plans", get(list_plans))
        .route("/api/button", post(render_button))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("memberships-server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  GET  /api/status  - Membership/connection status");
    tracing::info!("  GET  /api/plans   - Published plans");
    tracing::info!("  POST /api/button  - Render a purchase button");

    axum::serve(listener, app).await?;

    Ok(())
}

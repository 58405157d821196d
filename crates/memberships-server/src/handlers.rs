//! HTTP Handlers

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use memberships_core::button::{ButtonRenderRequest, RenderOutcome};
use memberships_core::error::MembershipsError;
use memberships_core::model::{ConnectionStatus, PlanSummary};
use memberships_core::plans::PlanRepository;

use crate::state::{AppState, ButtonCapability};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub deployment_mode: &'static str,
    pub button_exposed: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn error_status(err: &MembershipsError) -> StatusCode {
    match err {
        MembershipsError::MissingToken => StatusCode::UNAUTHORIZED,
        MembershipsError::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
        MembershipsError::Remote { .. } => StatusCode::BAD_REQUEST,
        MembershipsError::DecodeFailure(_) | MembershipsError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        deployment_mode: state.identity.deployment_mode.as_str(),
        button_exposed: matches!(state.button, ButtonCapability::Enabled(_)),
    })
}

/// Current membership/connection status for this site.
///
/// Backs a settings surface, so typed errors become user-visible
/// messages instead of bare 500s.
pub async fn membership_status(
    State(state): State<AppState>,
) -> Result<Json<ConnectionStatus>, (StatusCode, Json<ErrorResponse>)> {
    state
        .resolver
        .resolve(&state.identity)
        .await
        .map(Json)
        .map_err(|e| {
            let code = e.code().to_string();
            tracing::warn!(code = %code, "Status resolution failed: {}", e);
            (
                error_status(&e),
                Json(ErrorResponse {
                    error: e.user_message(),
                    code,
                }),
            )
        })
}

/// Published plans for this site
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<PlanSummary>> {
    Json(state.plans.published_plans())
}

/// Render a purchase button from caller attributes.
///
/// No-render outcomes are an empty 204, never an error page: the host
/// embeds this fragment in arbitrary content.
pub async fn render_button(
    State(state): State<AppState>,
    Json(request): Json<ButtonRenderRequest>,
) -> Response {
    match &state.button {
        ButtonCapability::Enabled(render) => match (**render)(&request) {
            RenderOutcome::Markup(html) => (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                html,
            )
                .into_response(),
            RenderOutcome::NoRender => StatusCode::NO_CONTENT.into_response(),
        },
        ButtonCapability::Unavailable(reason) => {
            (StatusCode::FORBIDDEN, Json(reason.clone())).into_response()
        }
    }
}

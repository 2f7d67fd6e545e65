//! Overview, provisioning and notification routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use super::DashboardState;
use crate::error::ApiError;
use crate::models::Notification;
use crate::services::{submit_provisioning, DashboardStats, StatsService, VmProvisionRequest};

/// Configure overview routes
pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/notifications", get(list_notifications))
        .route("/api/provisioning", post(provision_vm))
        .with_state(state)
}

async fn get_stats(State(state): State<DashboardState>) -> Json<DashboardStats> {
    let requests = state.requests.all().await;
    let store = state.files.store().read().await;
    Json(StatsService::compute(
        store.folders(),
        store.files(),
        &requests,
        Utc::now(),
    ))
}

/// Recent toasts, newest last
async fn list_notifications(State(state): State<DashboardState>) -> Json<Vec<Notification>> {
    Json(state.notifier.recent())
}

/// Validate the VM form; field problems come back as 422 with per-field messages
async fn provision_vm(
    State(state): State<DashboardState>,
    Json(form): Json<VmProvisionRequest>,
) -> Response {
    match submit_provisioning(&state.requests, &form).await {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(errors) => {
            let body = ApiError {
                code: "VALIDATION_ERROR".to_string(),
                message: "The provisioning form has errors".to_string(),
                details: serde_json::to_value(&errors).ok(),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
    }
}

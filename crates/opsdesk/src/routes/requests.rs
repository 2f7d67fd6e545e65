//! Service request HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{get_user_id, DashboardState};
use crate::error::OpsError;
use crate::models::{
    Attachment, CreateServiceRequest, ListRequestsQuery, RequestComment, RequestStatus,
    ServiceRequest,
};
use crate::AuthenticatedUserId;

#[derive(Deserialize)]
pub struct TransitionApiRequest {
    pub to: RequestStatus,
}

#[derive(Deserialize, Default)]
pub struct ApproveApiRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectApiRequest {
    pub reason: String,
}

#[derive(Deserialize)]
pub struct CommentApiRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct AttachmentApiRequest {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Deserialize)]
pub struct AssignApiRequest {
    pub assignee: String,
}

/// Current status and the legal next steps
#[derive(Serialize)]
pub struct TransitionsResponse {
    pub status: RequestStatus,
    pub allowed: &'static [RequestStatus],
}

/// Configure service request routes
pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/api/requests", get(list_requests).post(create_request))
        .route("/api/requests/{id}", get(get_request))
        .route("/api/requests/{id}/transitions", get(get_transitions))
        .route("/api/requests/{id}/transition", post(transition_request))
        .route("/api/requests/{id}/approve", post(approve_request))
        .route("/api/requests/{id}/reject", post(reject_request))
        .route("/api/requests/{id}/assign", post(assign_request))
        .route("/api/requests/{id}/comments", post(add_comment))
        .route("/api/requests/{id}/attachments", post(add_attachment))
        .with_state(state)
}

async fn list_requests(
    State(state): State<DashboardState>,
    Query(query): Query<ListRequestsQuery>,
) -> Json<Vec<ServiceRequest>> {
    Json(state.requests.list(&query).await)
}

async fn create_request(
    State(state): State<DashboardState>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceRequest>), OpsError> {
    let created = state.requests.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_request(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceRequest>, OpsError> {
    Ok(Json(state.requests.get(&id).await?))
}

async fn get_transitions(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionsResponse>, OpsError> {
    let request = state.requests.get(&id).await?;
    Ok(Json(TransitionsResponse {
        status: request.status,
        allowed: request.status.next_states(),
    }))
}

async fn transition_request(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Json<ServiceRequest>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.requests.transition(&id, req.to, &user_id).await?))
}

async fn approve_request(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<ApproveApiRequest>,
) -> Result<Json<ServiceRequest>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.requests.approve(&id, &user_id, req.comment).await?))
}

async fn reject_request(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<RejectApiRequest>,
) -> Result<Json<ServiceRequest>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.requests.reject(&id, &user_id, &req.reason).await?))
}

async fn assign_request(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Json(req): Json<AssignApiRequest>,
) -> Result<Json<ServiceRequest>, OpsError> {
    Ok(Json(state.requests.assign(&id, &req.assignee).await?))
}

async fn add_comment(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<CommentApiRequest>,
) -> Result<(StatusCode, Json<RequestComment>), OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let comment = state.requests.add_comment(&id, &user_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn add_attachment(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<AttachmentApiRequest>,
) -> Result<(StatusCode, Json<Attachment>), OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let attachment = state
        .requests
        .add_attachment(&id, &req.name, req.size, &user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

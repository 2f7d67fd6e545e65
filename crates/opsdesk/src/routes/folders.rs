//! Folder HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Deserialize;

use super::{get_user_id, DashboardState};
use crate::error::OpsError;
use crate::models::{CreateFolderRequest, Folder, UpdateFolderRequest};
use crate::services::{Crumb, DeletedFolder};
use crate::AuthenticatedUserId;

#[derive(Deserialize, Default)]
pub struct DeleteFolderParams {
    #[serde(default)]
    pub recursive: bool,
}

/// Configure folder routes
pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/api/folders", get(list_folders).post(create_folder))
        .route("/api/folders/{id}", patch(update_folder).delete(delete_folder))
        .route("/api/folders/{id}/breadcrumbs", get(get_breadcrumbs))
        .with_state(state)
}

async fn list_folders(State(state): State<DashboardState>) -> Json<Vec<Folder>> {
    Json(state.files.folders().await)
}

async fn create_folder(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let folder = state.files.create_folder(req, &user_id).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// Rename, recolor, re-share or move a folder
async fn update_folder(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<Folder>, OpsError> {
    Ok(Json(state.files.update_folder(&id, req).await?))
}

async fn delete_folder(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Query(params): Query<DeleteFolderParams>,
) -> Result<Json<DeletedFolder>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let deleted = state
        .files
        .delete_folder(&id, params.recursive, &user_id)
        .await?;
    Ok(Json(deleted))
}

async fn get_breadcrumbs(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Crumb>>, OpsError> {
    Ok(Json(state.files.breadcrumbs(&id).await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_folder_lifecycle() {
        let (_, app) = app();
        let (_, root) = send(&app, "POST", "/api/folders", Some(json!({ "name": "Root" }))).await;
        let root_id = root["id"].as_str().unwrap().to_string();
        let (status, child) = send(
            &app,
            "POST",
            "/api/folders",
            Some(json!({ "name": "Child", "parentId": root_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let child_id = child["id"].as_str().unwrap().to_string();

        let (status, crumbs) = send(&app, "GET", &format!("/api/folders/{child_id}/breadcrumbs"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(crumbs[0]["name"], "Home");
        assert_eq!(crumbs[2]["name"], "Child");

        let (status, body) = send(&app, "DELETE", &format!("/api/folders/{root_id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "FOLDER_NOT_EMPTY");

        let (status, body) = send(&app, "DELETE", &format!("/api/folders/{root_id}?recursive=true"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["folders"], 2);
    }

    #[tokio::test]
    async fn test_unknown_folder_breadcrumbs_404() {
        let (_, app) = app();
        let (status, body) = send(&app, "GET", "/api/folders/missing/breadcrumbs", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "FOLDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_move_into_descendant_rejected() {
        let (_, app) = app();
        let (_, a) = send(&app, "POST", "/api/folders", Some(json!({ "name": "A" }))).await;
        let a_id = a["id"].as_str().unwrap().to_string();
        let (_, b) = send(&app, "POST", "/api/folders", Some(json!({ "name": "B", "parentId": a_id }))).await;
        let b_id = b["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/folders/{a_id}"),
            Some(json!({ "parentId": b_id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CYCLIC_MOVE");
    }
}

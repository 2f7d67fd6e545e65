//! File browser HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{get_user_id, DashboardState};
use crate::error::{OpsError, OpsResult};
use crate::models::{
    AddVersionRequest, FileComment, FileItem, FileQuery, FileType, NewFileRequest, SortDirection,
    SortField, SortOption, UpdateFileRequest, Version, ViewMode,
};
use crate::services::{ActionOutcome, FileListing, ItemAction};
use crate::AuthenticatedUserId;

/// Query params for the file browser listing
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesParams {
    pub folder_id: Option<String>,
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub view: Option<String>,
    #[serde(default)]
    pub starred: bool,
    pub tag: Option<String>,
}

impl ListFilesParams {
    /// Build a pipeline query, filling gaps from `default_sort`
    pub fn to_query(&self, default_sort: SortOption) -> OpsResult<FileQuery> {
        let field = match self.sort.as_deref() {
            Some(s) => s.parse::<SortField>().map_err(OpsError::Validation)?,
            None => default_sort.field,
        };
        let direction = match self.dir.as_deref() {
            Some(d) => d.parse::<SortDirection>().map_err(OpsError::Validation)?,
            None => default_sort.direction,
        };
        let file_type = match self.file_type.as_deref() {
            None | Some("") | Some("all") => None,
            Some(t) => Some(t.parse::<FileType>().map_err(OpsError::Validation)?),
        };

        let mut query = FileQuery::in_folder(
            self.folder_id.clone().filter(|id| !id.is_empty()),
            SortOption::new(field, direction),
        )
        .with_search(self.q.clone().unwrap_or_default())
        .with_type(file_type);
        query.starred_only = self.starred;
        query.tag = self.tag.clone().filter(|t| !t.trim().is_empty());
        Ok(query)
    }

    pub fn view_mode(&self) -> OpsResult<ViewMode> {
        match self.view.as_deref() {
            None | Some("list") => Ok(ViewMode::List),
            Some("grid") => Ok(ViewMode::Grid),
            Some(other) => Err(OpsError::Validation(format!("Invalid view mode: {}", other))),
        }
    }
}

#[derive(Deserialize)]
pub struct CommentApiRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct ItemActionApiRequest {
    pub action: ItemAction,
}

#[derive(Serialize)]
pub struct StarResponse {
    pub starred: bool,
}

/// Configure file routes
pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/api/files", get(list_files).post(add_file))
        .route(
            "/api/files/{id}",
            get(get_file).patch(update_file).delete(delete_file),
        )
        .route("/api/files/{id}/star", post(toggle_star))
        .route("/api/files/{id}/view", post(view_file))
        .route("/api/files/{id}/versions", post(add_version))
        .route("/api/files/{id}/comments", post(add_comment))
        .route("/api/files/{id}/lock", post(lock_file).delete(unlock_file))
        .route("/api/items/{id}/actions", post(apply_action))
        .with_state(state)
}

async fn list_files(
    State(state): State<DashboardState>,
    Query(params): Query<ListFilesParams>,
) -> Result<Json<FileListing>, OpsError> {
    let query = params.to_query(state.config.default_sort)?;
    let mode = params.view_mode()?;
    Ok(Json(state.files.list(&query, mode).await?))
}

async fn add_file(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Json(req): Json<NewFileRequest>,
) -> Result<(StatusCode, Json<FileItem>), OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let file = state.files.add_file(req, &user_id).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

async fn get_file(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<FileItem>, OpsError> {
    Ok(Json(state.files.get_file(&id).await?))
}

/// Rename, move or retag a file
async fn update_file(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFileRequest>,
) -> Result<Json<FileItem>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.files.update_file(&id, req, &user_id).await?))
}

async fn delete_file(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
) -> Result<StatusCode, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    state.files.delete_file(&id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_star(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<StarResponse>, OpsError> {
    let starred = state.files.toggle_star(&id).await?;
    Ok(Json(StarResponse { starred }))
}

/// Open a file, recording the access time
async fn view_file(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<FileItem>, OpsError> {
    Ok(Json(state.files.view_file(&id).await?))
}

async fn add_version(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<AddVersionRequest>,
) -> Result<(StatusCode, Json<Version>), OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let version = state.files.add_version(&id, &user_id, req).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

async fn add_comment(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<CommentApiRequest>,
) -> Result<(StatusCode, Json<FileComment>), OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    let comment = state.files.add_comment(&id, &user_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn lock_file(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
) -> Result<Json<FileItem>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.files.lock(&id, &user_id).await?))
}

async fn unlock_file(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
) -> Result<Json<FileItem>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.files.unlock(&id, &user_id).await?))
}

/// Per-item callback from the list or grid view
async fn apply_action(
    State(state): State<DashboardState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(id): Path<String>,
    Json(req): Json<ItemActionApiRequest>,
) -> Result<Json<ActionOutcome>, OpsError> {
    let user_id = get_user_id(auth_user.as_ref().map(|e| &e.0), &state);
    Ok(Json(state.files.apply_action(&id, req.action, &user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;
    use serde_json::json;

    async fn upload(app: &axum::Router, name: &str, size: u64) -> String {
        let (status, file) = send(app, "POST", "/api/files", Some(json!({ "name": name, "size": size }))).await;
        assert_eq!(status, StatusCode::CREATED);
        file["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_params_fall_back_to_default_sort() {
        let params = ListFilesParams::default();
        let query = params.to_query(SortOption::descending(SortField::Size)).unwrap();
        assert_eq!(query.sort, SortOption::descending(SortField::Size));
        assert_eq!(params.view_mode().unwrap(), ViewMode::List);

        let params = ListFilesParams {
            file_type: Some("spaceship".into()),
            ..Default::default()
        };
        assert!(params.to_query(SortOption::ascending(SortField::Name)).is_err());
    }

    #[tokio::test]
    async fn test_listing_sorted_and_filtered() {
        let (_, app) = app();
        upload(&app, "Zeta.pdf", 100).await;
        upload(&app, "Alpha.docx", 50).await;
        upload(&app, "photo.png", 10).await;

        let (status, listing) = send(&app, "GET", "/api/files?sort=name&dir=asc", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = listing["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha.docx", "photo.png", "Zeta.pdf"]);
        assert_eq!(listing["breadcrumbs"][0]["name"], "Home");

        let (_, listing) = send(&app, "GET", "/api/files?type=image&view=grid", None).await;
        assert_eq!(listing["files"].as_array().unwrap().len(), 1);
        assert_eq!(listing["view"]["mode"], "grid");
    }

    #[tokio::test]
    async fn test_star_twice_restores() {
        let (_, app) = app();
        let id = upload(&app, "notes.txt", 1).await;
        let (_, first) = send(&app, "POST", &format!("/api/files/{id}/star"), None).await;
        let (_, second) = send(&app, "POST", &format!("/api/files/{id}/star"), None).await;
        assert_eq!(first["starred"], true);
        assert_eq!(second["starred"], false);
    }

    #[tokio::test]
    async fn test_versions_and_locks() {
        let (state, app) = app();
        let id = upload(&app, "plan.docx", 10).await;

        let (status, version) = send(
            &app,
            "POST",
            &format!("/api/files/{id}/versions"),
            Some(json!({ "fileSize": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(version["versionNumber"], "1.1");
        assert_eq!(version["uploadedBy"], "tester");

        let (status, _) = send(&app, "POST", &format!("/api/files/{id}/lock"), None).await;
        assert_eq!(status, StatusCode::OK);

        // someone else cannot delete it
        state.files.unlock(&id, "tester").await.unwrap();
        state.files.lock(&id, "mallory").await.unwrap();
        let (status, body) = send(&app, "DELETE", &format!("/api/files/{id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "LOCKED");
    }

    #[tokio::test]
    async fn test_version_upload_respects_lock_of_another_user() {
        let (state, app) = app();
        let id = upload(&app, "budget.xlsx", 10).await;
        state.files.lock(&id, "mallory").await.unwrap();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/files/{id}/versions"),
            Some(json!({ "uploadedBy": "mallory", "fileSize": 20 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "LOCKED");

        let file = state.files.get_file(&id).await.unwrap();
        assert_eq!(file.versions.len(), 1);
        assert_eq!(file.size, 10);
    }

    #[tokio::test]
    async fn test_item_action_delete() {
        let (_, app) = app();
        let id = upload(&app, "old.log", 1).await;
        let (status, outcome) = send(
            &app,
            "POST",
            &format!("/api/items/{id}/actions"),
            Some(json!({ "action": "delete" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["action"], "deleted");

        let (status, _) = send(&app, "GET", &format!("/api/files/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

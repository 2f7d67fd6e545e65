//! Error types for the dashboard core

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::models::RequestStatus;

/// Result type alias for dashboard operations
pub type OpsResult<T> = Result<T, OpsError>;

/// Dashboard error types
#[derive(Debug, Error)]
pub enum OpsError {
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Service request not found: {0}")]
    RequestNotFound(String),

    #[error("Item already exists: {name}")]
    AlreadyExists { name: String },

    #[error("Invalid name: {name} (contains forbidden characters or path sequences)")]
    InvalidName { name: String },

    #[error("Folder {folder_id} is not empty")]
    FolderNotEmpty { folder_id: String },

    #[error("Cannot move folder {folder_id} into its own subtree")]
    CyclicMove { folder_id: String },

    #[error("File {file_id} is locked by {locked_by}")]
    Locked { file_id: String, locked_by: String },

    #[error("File {file_id} is not locked by {user}")]
    NotLockHolder { file_id: String, user: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for OpsError {
    fn from(err: serde_json::Error) -> Self {
        OpsError::Serialization(err.to_string())
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl OpsError {
    /// Convert to API error code
    pub fn code(&self) -> &'static str {
        match self {
            OpsError::FolderNotFound(_) => "FOLDER_NOT_FOUND",
            OpsError::FileNotFound(_) => "FILE_NOT_FOUND",
            OpsError::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            OpsError::AlreadyExists { .. } => "ALREADY_EXISTS",
            OpsError::InvalidName { .. } => "INVALID_NAME",
            OpsError::FolderNotEmpty { .. } => "FOLDER_NOT_EMPTY",
            OpsError::CyclicMove { .. } => "CYCLIC_MOVE",
            OpsError::Locked { .. } => "LOCKED",
            OpsError::NotLockHolder { .. } => "NOT_LOCK_HOLDER",
            OpsError::InvalidTransition { .. } => "INVALID_TRANSITION",
            OpsError::Validation(_) => "VALIDATION_ERROR",
            OpsError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OpsError::FolderNotFound(_)
            | OpsError::FileNotFound(_)
            | OpsError::RequestNotFound(_) => StatusCode::NOT_FOUND,

            OpsError::AlreadyExists { .. }
            | OpsError::FolderNotEmpty { .. }
            | OpsError::Locked { .. }
            | OpsError::InvalidTransition { .. } => StatusCode::CONFLICT,

            OpsError::NotLockHolder { .. } => StatusCode::FORBIDDEN,

            OpsError::InvalidName { .. }
            | OpsError::CyclicMove { .. }
            | OpsError::Validation(_) => StatusCode::BAD_REQUEST,

            OpsError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OpsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            OpsError::InvalidTransition { from, .. } => Some(serde_json::json!({
                "allowed": from.next_states(),
            })),
            _ => None,
        };
        let body = ApiError {
            code: self.code().to_string(),
            message: self.to_string(),
            details,
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_status() {
        let err = OpsError::FileNotFound("f1".into());
        assert_eq!(err.code(), "FILE_NOT_FOUND");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = OpsError::InvalidTransition {
            from: RequestStatus::Completed,
            to: RequestStatus::Draft,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Invalid status transition: completed -> draft");
    }
}

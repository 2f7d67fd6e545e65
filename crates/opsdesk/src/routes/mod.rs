//! Routes module - HTTP API endpoints

pub mod dashboard;
pub mod files;
pub mod folders;
pub mod requests;

use axum::Router;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::services::{FileService, Notifier, RequestService};

pub use crate::AuthenticatedUserId;

/// Shared state for every dashboard route
#[derive(Clone)]
pub struct DashboardState {
    pub files: FileService,
    pub requests: RequestService,
    pub notifier: Notifier,
    pub config: Arc<DashboardConfig>,
    /// Acting user when no identity was attached to the request
    pub user_id: String,
}

impl DashboardState {
    pub fn new(config: DashboardConfig, user_id: impl Into<String>) -> Self {
        let config = Arc::new(config);
        let notifier = Notifier::new(config.notification_history);
        Self {
            files: FileService::new(config.clone(), notifier.clone()),
            requests: RequestService::new(notifier.clone()),
            notifier,
            config,
            user_id: user_id.into(),
        }
    }
}

/// Helper function to get user ID from Extension or fallback to state
pub fn get_user_id(auth_user: Option<&AuthenticatedUserId>, state: &DashboardState) -> String {
    auth_user
        .map(|u| u.0.clone())
        .unwrap_or_else(|| state.user_id.clone())
}

/// Configure all dashboard API routes
pub fn configure(state: DashboardState) -> Router {
    Router::new()
        .merge(folders::routes(state.clone()))
        .merge(files::routes(state.clone()))
        .merge(requests::routes(state.clone()))
        .merge(dashboard::routes(state))
}

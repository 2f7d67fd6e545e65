//! Opsdesk - IT operations dashboard core
//!
//! Everything behind the dashboard pages, without the UI itself.
//!
//! # Features
//! - File repository: nested folders, files with versions, comments and locks
//! - Breadcrumb trails and the filter/sort pipeline behind the file browser
//! - List and grid renderings of the same listing
//! - Service request workflow with an explicit transition table
//! - VM provisioning form validation
//! - Toast notifications and chart statistics
//! - Axum routes exposing all of the above

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod seed;
pub mod services;

pub use config::DashboardConfig;
pub use error::{OpsError, OpsResult};
pub use routes::DashboardState;

/// Acting user set by the server's identity middleware
#[derive(Clone, Debug)]
pub struct AuthenticatedUserId(pub String);

impl AuthenticatedUserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

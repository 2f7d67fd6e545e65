//! Business logic services

pub mod breadcrumb;
pub mod file_service;
pub mod file_store;
pub mod notification;
pub mod pipeline;
pub mod provisioning;
pub mod request_service;
pub mod stats_service;
pub mod view;

pub use breadcrumb::{resolve_breadcrumbs, BreadcrumbResolver, BreadcrumbStrategy, Crumb, HOME_LABEL};
pub use file_service::{ActionOutcome, FileListing, FileService};
pub use file_store::{DeletedFolder, FileStore, NewFile};
pub use notification::Notifier;
pub use pipeline::{sort_files, FilterSortPipeline, Listing};
pub use provisioning::{submit_provisioning, Environment, FieldErrors, VmProvisionRequest};
pub use request_service::RequestService;
pub use stats_service::{ChartPoint, DashboardStats, StatsService};
pub use view::{renderer_for, GridView, ItemAction, ListView, RenderedView, ViewRenderer};

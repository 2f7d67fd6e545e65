//! Dashboard configuration module

use serde::{Deserialize, Serialize};

use crate::models::{SortField, SortOption};
use crate::services::BreadcrumbStrategy;

/// Dashboard feature configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of tiles per row in the grid view
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,

    /// How breadcrumb trails are rebuilt
    #[serde(default)]
    pub breadcrumb_strategy: BreadcrumbStrategy,

    /// File locks expire after this many minutes (0 = never)
    #[serde(default = "default_lock_duration")]
    pub lock_duration_minutes: i64,

    /// Number of notifications kept for the history endpoint
    #[serde(default = "default_notification_history")]
    pub notification_history: usize,

    /// Sort applied when a listing request names none
    #[serde(default = "default_sort")]
    pub default_sort: SortOption,

    /// Whether to load the demo folders, files and requests at startup
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

fn default_grid_columns() -> usize {
    4
}

fn default_lock_duration() -> i64 {
    30
}

fn default_notification_history() -> usize {
    50
}

fn default_sort() -> SortOption {
    SortOption::ascending(SortField::Name)
}

fn default_true() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            grid_columns: default_grid_columns(),
            breadcrumb_strategy: BreadcrumbStrategy::default(),
            lock_duration_minutes: default_lock_duration(),
            notification_history: default_notification_history(),
            default_sort: default_sort(),
            seed_demo_data: true,
        }
    }
}

impl DashboardConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock lifetime, `None` when locks never expire or the value is out of range
    pub fn lock_duration(&self) -> Option<chrono::Duration> {
        if self.lock_duration_minutes > 0 {
            chrono::Duration::try_minutes(self.lock_duration_minutes)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.grid_columns, 4);
        assert_eq!(config.breadcrumb_strategy, BreadcrumbStrategy::ParentChain);
        assert_eq!(config.default_sort.field, SortField::Name);
        assert_eq!(config.default_sort.direction, SortDirection::Asc);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_lock_duration_zero_means_forever() {
        let mut config = DashboardConfig::new();
        assert_eq!(config.lock_duration(), Some(chrono::Duration::minutes(30)));
        config.lock_duration_minutes = 0;
        assert!(config.lock_duration().is_none());
    }

    #[test]
    fn test_out_of_range_lock_duration_does_not_panic() {
        let config = DashboardConfig {
            lock_duration_minutes: i64::MAX,
            ..DashboardConfig::default()
        };
        assert!(config.lock_duration().is_none());
    }
}

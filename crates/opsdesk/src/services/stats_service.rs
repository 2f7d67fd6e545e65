//! Dashboard statistics
//!
//! Aggregations are returned as `{label, value}` points that the chart
//! widgets consume directly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{FileItem, FileType, Folder, RequestStatus, ServiceRequest};

const RECENT_FILES: usize = 5;

/// One bar or slice of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

impl ChartPoint {
    fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFile {
    pub id: String,
    pub name: String,
    pub path: String,
    pub last_accessed_at: DateTime<Utc>,
}

/// Everything the overview page shows
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_folders: u64,
    pub total_files: u64,
    pub total_storage: u64,
    pub starred_files: u64,
    pub locked_files: u64,
    pub open_requests: u64,
    pub storage_by_type: Vec<ChartPoint>,
    pub files_by_type: Vec<ChartPoint>,
    pub requests_by_status: Vec<ChartPoint>,
    pub recent_files: Vec<RecentFile>,
}

pub struct StatsService;

impl StatsService {
    pub fn compute<'a>(
        folders: impl IntoIterator<Item = &'a Folder>,
        files: impl IntoIterator<Item = &'a FileItem>,
        requests: &[ServiceRequest],
        now: DateTime<Utc>,
    ) -> DashboardStats {
        let files: Vec<&FileItem> = files.into_iter().collect();

        DashboardStats {
            total_folders: folders.into_iter().count() as u64,
            total_files: files.len() as u64,
            total_storage: files.iter().map(|f| f.size).fold(0, u64::saturating_add),
            starred_files: files.iter().filter(|f| f.starred).count() as u64,
            locked_files: files
                .iter()
                .filter(|f| f.active_lock_holder(now).is_some())
                .count() as u64,
            open_requests: requests.iter().filter(|r| !r.status.is_terminal()).count() as u64,
            storage_by_type: Self::by_type(&files, |f| f.size),
            files_by_type: Self::by_type(&files, |_| 1),
            requests_by_status: Self::requests_by_status(requests),
            recent_files: Self::recent_files(&files, RECENT_FILES),
        }
    }

    /// Sum `measure` per file type, skipping empty buckets
    fn by_type(files: &[&FileItem], measure: impl Fn(&FileItem) -> u64) -> Vec<ChartPoint> {
        FileType::ALL
            .iter()
            .map(|t| {
                let total = files
                    .iter()
                    .filter(|f| f.file_type == *t)
                    .map(|f| measure(f))
                    .fold(0, u64::saturating_add);
                ChartPoint::new(t.as_str(), total)
            })
            .filter(|p| p.value > 0)
            .collect()
    }

    /// Every status is reported, including zeros, so the axis is stable
    fn requests_by_status(requests: &[ServiceRequest]) -> Vec<ChartPoint> {
        RequestStatus::ALL
            .iter()
            .map(|s| {
                let count = requests.iter().filter(|r| r.status == *s).count() as u64;
                ChartPoint::new(s.as_str(), count)
            })
            .collect()
    }

    fn recent_files(files: &[&FileItem], limit: usize) -> Vec<RecentFile> {
        let mut accessed: Vec<(&FileItem, DateTime<Utc>)> = files
            .iter()
            .filter_map(|f| f.last_accessed_at.map(|at| (*f, at)))
            .collect();
        accessed.sort_by(|a, b| b.1.cmp(&a.1));
        accessed
            .into_iter()
            .take(limit)
            .map(|(f, at)| RecentFile {
                id: f.id.clone(),
                name: f.name.clone(),
                path: f.path.clone(),
                last_accessed_at: at,
            })
            .collect()
    }
}

//! List and grid presentation of a file listing
//!
//! Both renderers consume the same pipeline output and differ only in
//! layout. Neither owns mutation; item actions are dispatched back to
//! [`FileService`](super::FileService).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pipeline::Listing;
use crate::models::{FileItem, FileType, Folder, ViewMode};

/// Per-item callback exposed by both renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    View,
    ToggleStar,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File,
}

/// Flattened row/tile content
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: String,
    pub kind: ItemKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    pub size: u64,
    pub owner: String,
    pub updated_at: DateTime<Utc>,
    pub starred: bool,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    pub actions: Vec<ItemAction>,
}

impl From<&Folder> for ItemSummary {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.clone(),
            kind: ItemKind::Folder,
            name: f.name.clone(),
            file_type: None,
            size: f.size,
            owner: f.owner.clone(),
            updated_at: f.updated_at,
            starred: false,
            is_locked: false,
            color: Some(f.color.clone()),
            item_count: Some(f.item_count),
            actions: vec![ItemAction::View, ItemAction::Delete],
        }
    }
}

impl From<&FileItem> for ItemSummary {
    fn from(f: &FileItem) -> Self {
        Self {
            id: f.id.clone(),
            kind: ItemKind::File,
            name: f.name.clone(),
            file_type: Some(f.file_type),
            size: f.size,
            owner: f.owner.clone(),
            updated_at: f.updated_at,
            starred: f.starred,
            is_locked: f.is_locked,
            color: None,
            item_count: None,
            actions: vec![ItemAction::View, ItemAction::ToggleStar, ItemAction::Delete],
        }
    }
}

/// Rendered layout handed to the client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RenderedView {
    List {
        rows: Vec<ItemSummary>,
    },
    Grid {
        columns: usize,
        rows: Vec<Vec<ItemSummary>>,
    },
}

impl RenderedView {
    pub fn mode(&self) -> ViewMode {
        match self {
            RenderedView::List { .. } => ViewMode::List,
            RenderedView::Grid { .. } => ViewMode::Grid,
        }
    }

    /// Items in display order regardless of layout
    pub fn items(&self) -> Vec<&ItemSummary> {
        match self {
            RenderedView::List { rows } => rows.iter().collect(),
            RenderedView::Grid { rows, .. } => rows.iter().flatten().collect(),
        }
    }
}

/// Presentation strategy over a listing
pub trait ViewRenderer: Send + Sync {
    fn mode(&self) -> ViewMode;

    fn render(&self, listing: &Listing<'_>) -> RenderedView;
}

/// Folders first, then files, in pipeline order
fn summaries(listing: &Listing<'_>) -> Vec<ItemSummary> {
    listing
        .folders
        .iter()
        .map(|f| ItemSummary::from(*f))
        .chain(listing.files.iter().map(|f| ItemSummary::from(*f)))
        .collect()
}

pub struct ListView;

impl ViewRenderer for ListView {
    fn mode(&self) -> ViewMode {
        ViewMode::List
    }

    fn render(&self, listing: &Listing<'_>) -> RenderedView {
        RenderedView::List {
            rows: summaries(listing),
        }
    }
}

pub struct GridView {
    columns: usize,
}

impl GridView {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }
}

impl ViewRenderer for GridView {
    fn mode(&self) -> ViewMode {
        ViewMode::Grid
    }

    fn render(&self, listing: &Listing<'_>) -> RenderedView {
        let rows = summaries(listing)
            .chunks(self.columns)
            .map(<[ItemSummary]>::to_vec)
            .collect();
        RenderedView::Grid {
            columns: self.columns,
            rows,
        }
    }
}

/// Pick the renderer for a view mode
pub fn renderer_for(mode: ViewMode, grid_columns: usize) -> Box<dyn ViewRenderer> {
    match mode {
        ViewMode::List => Box::new(ListView),
        ViewMode::Grid => Box::new(GridView::new(grid_columns)),
    }
}

//! Folder model for the file repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Permission;

/// Folder in the repository tree.
///
/// `path` is denormalized: it holds the names of every ancestor from the
/// root down to and including this folder. The store keeps it in step with
/// `parent_id` on rename and move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub path: Vec<String>,
    pub owner: String,
    pub permissions: Permission,
    pub color: String,
    pub item_count: u64,
    pub size: u64,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Create a folder below `parent` (or at the root)
    pub fn new(name: String, parent: Option<&Folder>, owner: String, permissions: Permission) -> Self {
        let now = Utc::now();
        let mut path = parent.map(|p| p.path.clone()).unwrap_or_default();
        path.push(name.clone());
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            parent_id: parent.map(|p| p.id.clone()),
            path,
            owner,
            permissions,
            color: default_color(),
            item_count: 0,
            size: 0,
            is_shared: permissions.is_shared(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Slash-joined display path ("/Engineering/Specs")
    pub fn display_path(&self) -> String {
        format!("/{}", self.path.join("/"))
    }
}

pub fn default_color() -> String {
    "#3b82f6".to_string()
}

/// Request to create a new folder
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub permissions: Option<Permission>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request to update a folder
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub permissions: Option<Permission>,
    /// `Some(None)` moves the folder to the root
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub parent_id: Option<Option<String>>,
}

/// Distinguishes an absent field from an explicit `null`
pub(crate) mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

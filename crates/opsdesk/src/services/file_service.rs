//! File repository service
//!
//! Owns the shared [`FileStore`] behind an async lock, evaluates listings
//! through the filter/sort pipeline and a view renderer, and publishes a
//! notification for every user-visible mutation.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::breadcrumb::{BreadcrumbResolver, Crumb};
use super::file_store::{DeletedFolder, FileStore, NewFile};
use super::notification::Notifier;
use super::pipeline::FilterSortPipeline;
use super::view::{renderer_for, ItemAction, RenderedView};
use crate::config::DashboardConfig;
use crate::error::{OpsError, OpsResult};
use crate::models::{
    AddVersionRequest, CreateFolderRequest, FileComment, FileItem, FileQuery, Folder,
    NewFileRequest, NotificationVariant, Permission, UpdateFileRequest, UpdateFolderRequest,
    Version, ViewMode,
};

/// Fully evaluated file browser page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    pub current_folder: Option<Folder>,
    pub breadcrumbs: Vec<Crumb>,
    pub folders: Vec<Folder>,
    pub files: Vec<FileItem>,
    pub view: RenderedView,
}

/// Result of dispatching an item action
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionOutcome {
    Viewed { item: Box<FileItem> },
    FolderOpened { listing: Box<FileListing> },
    Starred { starred: bool },
    Deleted { id: String },
}

#[derive(Clone)]
pub struct FileService {
    store: Arc<RwLock<FileStore>>,
    notifier: Notifier,
    config: Arc<DashboardConfig>,
}

impl FileService {
    pub fn new(config: Arc<DashboardConfig>, notifier: Notifier) -> Self {
        Self {
            store: Arc::new(RwLock::new(FileStore::new(config.lock_duration()))),
            notifier,
            config,
        }
    }

    /// Direct access for seeding and tests
    pub fn store(&self) -> &Arc<RwLock<FileStore>> {
        &self.store
    }

    // ========================================
    // Listing
    // ========================================

    pub async fn list(&self, query: &FileQuery, mode: ViewMode) -> OpsResult<FileListing> {
        let store = self.store.read().await;
        let current_folder = query
            .current_folder_id
            .as_deref()
            .map(|id| store.folder(id).cloned())
            .transpose()?;

        let breadcrumbs = BreadcrumbResolver::new(store.folders(), self.config.breadcrumb_strategy)
            .resolve(query.current_folder_id.as_deref());
        let listing = FilterSortPipeline::new(query).run(store.folders(), store.files());
        let view = renderer_for(mode, self.config.grid_columns).render(&listing);

        Ok(FileListing {
            current_folder,
            breadcrumbs,
            folders: listing.folders.into_iter().cloned().collect(),
            files: listing.files.into_iter().cloned().collect(),
            view,
        })
    }

    /// Breadcrumbs for a folder; unknown folders are reported, not masked
    pub async fn breadcrumbs(&self, folder_id: &str) -> OpsResult<Vec<Crumb>> {
        let store = self.store.read().await;
        store.folder(folder_id)?;
        Ok(BreadcrumbResolver::new(store.folders(), self.config.breadcrumb_strategy).resolve(Some(folder_id)))
    }

    pub async fn folders(&self) -> Vec<Folder> {
        self.store.read().await.folders().cloned().collect()
    }

    pub async fn get_file(&self, id: &str) -> OpsResult<FileItem> {
        self.store.read().await.file(id).cloned()
    }

    // ========================================
    // Folder Operations
    // ========================================

    pub async fn create_folder(&self, req: CreateFolderRequest, actor: &str) -> OpsResult<Folder> {
        let owner = req.owner.unwrap_or_else(|| actor.to_string());
        let folder = self.store.write().await.create_folder(
            &req.name,
            req.parent_id.as_deref(),
            &owner,
            req.permissions.unwrap_or_default(),
            req.color,
        )?;
        self.notifier
            .success("Folder created", format!("{} was created", folder.display_path()));
        Ok(folder)
    }

    pub async fn update_folder(&self, id: &str, req: UpdateFolderRequest) -> OpsResult<Folder> {
        let folder = self.store.write().await.update_folder(id, req)?;
        self.notifier
            .success("Folder updated", format!("{} was updated", folder.display_path()));
        Ok(folder)
    }

    pub async fn delete_folder(&self, id: &str, recursive: bool, actor: &str) -> OpsResult<DeletedFolder> {
        let mut store = self.store.write().await;
        let name = store.folder(id)?.name.clone();
        let deleted = store.delete_folder(id, recursive, actor)?;
        drop(store);
        self.notifier.destructive(
            "Folder deleted",
            format!("{} and {} file(s) were removed", name, deleted.files),
        );
        Ok(deleted)
    }

    // ========================================
    // File Operations
    // ========================================

    pub async fn add_file(&self, req: NewFileRequest, actor: &str) -> OpsResult<FileItem> {
        let new = NewFile {
            name: req.name,
            size: req.size,
            folder_id: req.folder_id,
            owner: req.owner.unwrap_or_else(|| actor.to_string()),
            permissions: req.permissions.unwrap_or(Permission::Team),
            tags: req.tags,
        };
        let file = self.store.write().await.add_file(new)?;
        self.notifier
            .success("File uploaded", format!("{} was uploaded", file.name));
        Ok(file)
    }

    pub async fn update_file(&self, id: &str, req: UpdateFileRequest, actor: &str) -> OpsResult<FileItem> {
        let file = self.store.write().await.update_file(id, req, actor)?;
        self.notifier
            .success("File updated", format!("{} was updated", file.name));
        Ok(file)
    }

    pub async fn toggle_star(&self, id: &str) -> OpsResult<bool> {
        let mut store = self.store.write().await;
        let starred = store.toggle_star(id)?;
        let name = store.file(id)?.name.clone();
        drop(store);
        let title = if starred { "Added to starred" } else { "Removed from starred" };
        self.notifier.notify(title, name, NotificationVariant::Default);
        Ok(starred)
    }

    pub async fn view_file(&self, id: &str) -> OpsResult<FileItem> {
        self.store.write().await.touch(id)
    }

    pub async fn delete_file(&self, id: &str, actor: &str) -> OpsResult<FileItem> {
        let removed = self.store.write().await.delete_file(id, actor)?;
        self.notifier
            .destructive("File deleted", format!("{} was removed", removed.name));
        Ok(removed)
    }

    pub async fn add_version(&self, id: &str, uploader: &str, req: AddVersionRequest) -> OpsResult<Version> {
        let mut store = self.store.write().await;
        let version = store.add_version(id, uploader, req)?;
        let name = store.file(id)?.name.clone();
        drop(store);
        self.notifier.success(
            "New version uploaded",
            format!("{} is now at version {}", name, version.version_number),
        );
        Ok(version)
    }

    pub async fn add_comment(&self, id: &str, author: &str, content: &str) -> OpsResult<FileComment> {
        self.store.write().await.add_comment(id, author, content)
    }

    pub async fn lock(&self, id: &str, user: &str) -> OpsResult<FileItem> {
        let file = self.store.write().await.lock(id, user)?;
        self.notifier
            .notify("File locked", format!("{} is locked by {}", file.name, user), NotificationVariant::Default);
        Ok(file)
    }

    pub async fn unlock(&self, id: &str, user: &str) -> OpsResult<FileItem> {
        let file = self.store.write().await.unlock(id, user)?;
        self.notifier
            .notify("File unlocked", format!("{} is available for editing", file.name), NotificationVariant::Default);
        Ok(file)
    }

    /// Dispatch a per-item callback from the list or grid view.
    ///
    /// `View` on a folder opens it with the config's default sort.
    pub async fn apply_action(&self, item_id: &str, action: ItemAction, actor: &str) -> OpsResult<ActionOutcome> {
        let is_folder = self.store.read().await.folder(item_id).is_ok();
        match (action, is_folder) {
            (ItemAction::View, true) => {
                let query = FileQuery::in_folder(Some(item_id.to_string()), self.config.default_sort);
                let listing = self.list(&query, ViewMode::default()).await?;
                Ok(ActionOutcome::FolderOpened {
                    listing: Box::new(listing),
                })
            }
            (ItemAction::View, false) => Ok(ActionOutcome::Viewed {
                item: Box::new(self.view_file(item_id).await?),
            }),
            (ItemAction::ToggleStar, true) => Err(OpsError::Validation(
                "Folders cannot be starred".to_string(),
            )),
            (ItemAction::ToggleStar, false) => Ok(ActionOutcome::Starred {
                starred: self.toggle_star(item_id).await?,
            }),
            (ItemAction::Delete, true) => {
                self.delete_folder(item_id, false, actor).await?;
                Ok(ActionOutcome::Deleted {
                    id: item_id.to_string(),
                })
            }
            (ItemAction::Delete, false) => {
                self.delete_file(item_id, actor).await?;
                Ok(ActionOutcome::Deleted {
                    id: item_id.to_string(),
                })
            }
        }
    }
}

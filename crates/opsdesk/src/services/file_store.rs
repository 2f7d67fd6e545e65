//! In-memory file repository
//!
//! Folders and files are kept in insertion-ordered maps keyed by id. Every
//! mutation keeps two invariants: a folder's `path` equals its ancestor name
//! chain, and every file has at least one version.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{OpsError, OpsResult};
use crate::models::{
    next_version_number, AddVersionRequest, FileComment, FileItem, Folder, Permission,
    UpdateFileRequest, UpdateFolderRequest, Version,
};
use crate::security::{normalize_tag, validate_item_name};

/// What a folder deletion removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFolder {
    pub folders: usize,
    pub files: usize,
}

/// Parameters for a new file
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub size: u64,
    pub folder_id: Option<String>,
    pub owner: String,
    pub permissions: Permission,
    pub tags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FileStore {
    folders: IndexMap<String, Folder>,
    files: IndexMap<String, FileItem>,
    lock_duration: Option<Duration>,
}

impl FileStore {
    pub fn new(lock_duration: Option<Duration>) -> Self {
        Self {
            folders: IndexMap::new(),
            files: IndexMap::new(),
            lock_duration,
        }
    }

    pub fn folders(&self) -> indexmap::map::Values<'_, String, Folder> {
        self.folders.values()
    }

    pub fn files(&self) -> indexmap::map::Values<'_, String, FileItem> {
        self.files.values()
    }

    pub fn folder(&self, id: &str) -> OpsResult<&Folder> {
        self.folders
            .get(id)
            .ok_or_else(|| OpsError::FolderNotFound(id.to_string()))
    }

    pub fn file(&self, id: &str) -> OpsResult<&FileItem> {
        self.files
            .get(id)
            .ok_or_else(|| OpsError::FileNotFound(id.to_string()))
    }

    fn file_mut(&mut self, id: &str) -> OpsResult<&mut FileItem> {
        self.files
            .get_mut(id)
            .ok_or_else(|| OpsError::FileNotFound(id.to_string()))
    }

    // ========================================
    // Folder Operations
    // ========================================

    /// Create a folder below `parent_id` (root when `None`)
    pub fn create_folder(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
        owner: &str,
        permissions: Permission,
        color: Option<String>,
    ) -> OpsResult<Folder> {
        validate_item_name(name)?;
        let parent = parent_id.map(|id| self.folder(id)).transpose()?;
        self.ensure_unique_folder_name(parent_id, name, None)?;

        let mut folder = Folder::new(name.to_string(), parent, owner.to_string(), permissions);
        if let Some(color) = color {
            folder = folder.with_color(color);
        }
        self.folders.insert(folder.id.clone(), folder.clone());
        self.refresh_stats(parent_id);
        tracing::info!("Created folder {} ({})", folder.display_path(), folder.id);
        Ok(folder)
    }

    /// Apply a partial update: rename, recolor, re-share or move
    pub fn update_folder(&mut self, id: &str, req: UpdateFolderRequest) -> OpsResult<Folder> {
        let current = self.folder(id)?;
        let old_parent = current.parent_id.clone();
        let target_parent = match &req.parent_id {
            Some(parent) => parent.clone(),
            None => old_parent.clone(),
        };
        let target_name = req.name.clone().unwrap_or_else(|| current.name.clone());

        // Check everything up front so a refused update leaves the tree untouched
        if req.name.is_some() {
            validate_item_name(&target_name)?;
        }
        if let Some(target) = target_parent.as_deref() {
            self.folder(target)?;
            if old_parent != target_parent && self.subtree_ids(id).iter().any(|f| f == target) {
                return Err(OpsError::CyclicMove {
                    folder_id: id.to_string(),
                });
            }
        }
        self.ensure_unique_folder_name(target_parent.as_deref(), &target_name, Some(id))?;

        let moved = old_parent != target_parent;
        let renamed = req.name.is_some();
        if moved || renamed {
            if let Some(folder) = self.folders.get_mut(id) {
                folder.parent_id = target_parent.clone();
                folder.name = target_name;
                folder.updated_at = Utc::now();
            }
            self.rebuild_paths(id);
        }
        if moved {
            self.refresh_stats(old_parent.as_deref());
            self.refresh_stats(target_parent.as_deref());
            tracing::info!("Moved folder {} under {:?}", id, target_parent);
        }

        let folder = self
            .folders
            .get_mut(id)
            .ok_or_else(|| OpsError::FolderNotFound(id.to_string()))?;
        if let Some(color) = req.color {
            folder.color = color;
            folder.updated_at = Utc::now();
        }
        if let Some(permissions) = req.permissions {
            folder.permissions = permissions;
            folder.is_shared = permissions.is_shared();
            folder.updated_at = Utc::now();
        }
        Ok(folder.clone())
    }

    /// Rename a folder and rewrite the paths of everything below it
    pub fn rename_folder(&mut self, id: &str, name: &str) -> OpsResult<Folder> {
        let req = UpdateFolderRequest {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let folder = self.update_folder(id, req)?;
        tracing::info!("Renamed folder {} to {}", id, name);
        Ok(folder)
    }

    /// Re-parent a folder; moving into its own subtree is refused
    pub fn move_folder(&mut self, id: &str, new_parent: Option<&str>) -> OpsResult<Folder> {
        let req = UpdateFolderRequest {
            parent_id: Some(new_parent.map(str::to_string)),
            ..Default::default()
        };
        self.update_folder(id, req)
    }

    /// Delete a folder. Non-empty folders need `recursive`.
    pub fn delete_folder(&mut self, id: &str, recursive: bool, actor: &str) -> OpsResult<DeletedFolder> {
        let parent_id = self.folder(id)?.parent_id.clone();
        let subtree = self.subtree_ids(id);
        let contained: Vec<String> = self
            .files
            .values()
            .filter(|f| f.folder_id.as_ref().is_some_and(|fid| subtree.contains(fid)))
            .map(|f| f.id.clone())
            .collect();

        if !recursive && (subtree.len() > 1 || !contained.is_empty()) {
            return Err(OpsError::FolderNotEmpty {
                folder_id: id.to_string(),
            });
        }

        let now = Utc::now();
        for file_id in &contained {
            self.ensure_not_locked_by_other(self.file(file_id)?, actor, now)?;
        }

        for file_id in &contained {
            self.files.shift_remove(file_id);
        }
        for folder_id in &subtree {
            self.folders.shift_remove(folder_id);
        }
        self.refresh_stats(parent_id.as_deref());

        tracing::info!(
            "Deleted folder {} ({} folders, {} files)",
            id,
            subtree.len(),
            contained.len()
        );
        Ok(DeletedFolder {
            folders: subtree.len(),
            files: contained.len(),
        })
    }

    /// `id` and every folder below it
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut out = vec![id.to_string()];
        let mut i = 0;
        while i < out.len() {
            let current = out[i].clone();
            out.extend(
                self.folders
                    .values()
                    .filter(|f| f.parent_id.as_deref() == Some(current.as_str()))
                    .map(|f| f.id.clone()),
            );
            i += 1;
        }
        out
    }

    fn ensure_unique_folder_name(&self, parent: Option<&str>, name: &str, except: Option<&str>) -> OpsResult<()> {
        let clash = self.folders.values().any(|f| {
            f.parent_id.as_deref() == parent
                && f.name.eq_ignore_ascii_case(name)
                && Some(f.id.as_str()) != except
        });
        if clash {
            Err(OpsError::AlreadyExists {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Recompute `path` for `root_id`'s subtree and the files inside it
    fn rebuild_paths(&mut self, root_id: &str) {
        for folder_id in self.subtree_ids(root_id) {
            let parent_path = self
                .folders
                .get(&folder_id)
                .and_then(|f| f.parent_id.as_ref())
                .and_then(|pid| self.folders.get(pid))
                .map(|p| p.path.clone())
                .unwrap_or_default();
            if let Some(folder) = self.folders.get_mut(&folder_id) {
                let mut path = parent_path;
                path.push(folder.name.clone());
                folder.path = path;
            }
            let display = self
                .folders
                .get(&folder_id)
                .map(Folder::display_path)
                .unwrap_or_else(|| "/".to_string());
            for file in self.files.values_mut() {
                if file.folder_id.as_deref() == Some(folder_id.as_str()) {
                    file.path = display.clone();
                }
            }
        }
    }

    /// Recompute item counts and sizes from `start` up to the root
    fn refresh_stats(&mut self, start: Option<&str>) {
        let mut cursor = start.map(str::to_string);
        let mut guard = 0;
        while let Some(id) = cursor {
            let child_folders: Vec<(u64, &str)> = self
                .folders
                .values()
                .filter(|f| f.parent_id.as_deref() == Some(id.as_str()))
                .map(|f| (f.size, f.id.as_str()))
                .collect();
            let child_files: Vec<u64> = self
                .files
                .values()
                .filter(|f| f.folder_id.as_deref() == Some(id.as_str()))
                .map(|f| f.size)
                .collect();
            let item_count = (child_folders.len() + child_files.len()) as u64;
            let size = child_folders
                .iter()
                .map(|(s, _)| *s)
                .chain(child_files.iter().copied())
                .fold(0u64, u64::saturating_add);

            let Some(folder) = self.folders.get_mut(&id) else {
                break;
            };
            folder.item_count = item_count;
            folder.size = size;
            cursor = folder.parent_id.clone();

            guard += 1;
            if guard > self.folders.len() {
                break;
            }
        }
    }

    fn folder_display_path(&self, folder_id: Option<&str>) -> OpsResult<String> {
        match folder_id {
            Some(id) => Ok(self.folder(id)?.display_path()),
            None => Ok("/".to_string()),
        }
    }

    // ========================================
    // File Operations
    // ========================================

    pub fn add_file(&mut self, new: NewFile) -> OpsResult<FileItem> {
        validate_item_name(&new.name)?;
        let path = self.folder_display_path(new.folder_id.as_deref())?;
        self.ensure_unique_file_name(new.folder_id.as_deref(), &new.name, None)?;
        let tags = new
            .tags
            .iter()
            .map(|t| normalize_tag(t))
            .collect::<OpsResult<Vec<_>>>()?;

        let mut file = FileItem::new(new.name, new.size, new.owner, new.permissions).with_tags(tags);
        file.folder_id = new.folder_id;
        file.path = path;

        self.files.insert(file.id.clone(), file.clone());
        self.refresh_stats(file.folder_id.as_deref());
        tracing::info!("Added file {} ({}, {} bytes)", file.name, file.id, file.size);
        Ok(file)
    }

    /// Rename, move or retag a file
    pub fn update_file(&mut self, id: &str, req: UpdateFileRequest, actor: &str) -> OpsResult<FileItem> {
        let now = Utc::now();
        let current = self.file(id)?;
        self.ensure_not_locked_by_other(current, actor, now)?;
        let old_folder = current.folder_id.clone();
        let target_folder = req.folder_id.clone().unwrap_or_else(|| old_folder.clone());
        let target_name = req.name.clone().unwrap_or_else(|| current.name.clone());

        if req.name.is_some() {
            validate_item_name(&target_name)?;
        }
        let path = self.folder_display_path(target_folder.as_deref())?;
        self.ensure_unique_file_name(target_folder.as_deref(), &target_name, Some(id))?;
        let tags = req
            .tags
            .map(|tags| tags.iter().map(|t| normalize_tag(t)).collect::<OpsResult<Vec<_>>>())
            .transpose()?;

        let file = self.file_mut(id)?;
        if target_name != file.name {
            let renamed = FileItem::new(target_name, file.size, file.owner.clone(), file.permissions);
            file.name = renamed.name;
            file.extension = renamed.extension;
            file.mime_type = renamed.mime_type;
            file.file_type = renamed.file_type;
        }
        file.folder_id = target_folder.clone();
        file.path = path;
        if let Some(tags) = tags {
            file.tags = tags;
        }
        file.updated_at = now;
        let updated = file.clone();

        if old_folder != target_folder {
            self.refresh_stats(old_folder.as_deref());
            self.refresh_stats(target_folder.as_deref());
        }
        tracing::info!("Updated file {}", id);
        Ok(updated)
    }

    pub fn move_file(&mut self, id: &str, folder_id: Option<&str>, actor: &str) -> OpsResult<FileItem> {
        let req = UpdateFileRequest {
            folder_id: Some(folder_id.map(str::to_string)),
            ..Default::default()
        };
        self.update_file(id, req, actor)
    }

    pub fn rename_file(&mut self, id: &str, name: &str, actor: &str) -> OpsResult<FileItem> {
        let req = UpdateFileRequest {
            name: Some(name.to_string()),
            ..Default::default()
        };
        self.update_file(id, req, actor)
    }

    /// Flip the starred flag, returning the new value
    pub fn toggle_star(&mut self, id: &str) -> OpsResult<bool> {
        let file = self.file_mut(id)?;
        file.starred = !file.starred;
        tracing::debug!("File {} starred={}", id, file.starred);
        Ok(file.starred)
    }

    /// Record that a file was opened
    pub fn touch(&mut self, id: &str) -> OpsResult<FileItem> {
        let file = self.file_mut(id)?;
        file.last_accessed_at = Some(Utc::now());
        tracing::debug!("File {} opened", id);
        Ok(file.clone())
    }

    pub fn delete_file(&mut self, id: &str, actor: &str) -> OpsResult<FileItem> {
        self.ensure_not_locked_by_other(self.file(id)?, actor, Utc::now())?;
        let removed = self
            .files
            .shift_remove(id)
            .ok_or_else(|| OpsError::FileNotFound(id.to_string()))?;
        self.refresh_stats(removed.folder_id.as_deref());
        tracing::info!("Deleted file {} ({})", removed.name, id);
        Ok(removed)
    }

    /// Append a version; the new entry becomes the current one
    pub fn add_version(&mut self, id: &str, uploader: &str, req: AddVersionRequest) -> OpsResult<Version> {
        let now = Utc::now();
        self.ensure_not_locked_by_other(self.file(id)?, uploader, now)?;

        let file = self.file_mut(id)?;
        let number = file
            .current_version()
            .map(|v| next_version_number(&v.version_number))
            .unwrap_or_else(|| "1.0".to_string());
        let version = Version::new(number, uploader.to_string(), req.file_size, req.comment);
        file.versions.push(version.clone());
        file.size = version.file_size;
        file.updated_at = now;
        let folder_id = file.folder_id.clone();

        self.refresh_stats(folder_id.as_deref());
        tracing::info!("File {} now at version {}", id, version.version_number);
        Ok(version)
    }

    pub fn add_comment(&mut self, id: &str, author: &str, content: &str) -> OpsResult<FileComment> {
        if content.trim().is_empty() {
            return Err(OpsError::Validation("Comment cannot be empty".to_string()));
        }
        let file = self.file_mut(id)?;
        let comment = FileComment::new(author.to_string(), content.trim().to_string());
        file.comments.push(comment.clone());
        tracing::info!("Comment added to file {} by {}", id, author);
        Ok(comment)
    }

    /// Take (or refresh) the edit lock on a file
    pub fn lock(&mut self, id: &str, user: &str) -> OpsResult<FileItem> {
        let now = Utc::now();
        self.ensure_not_locked_by_other(self.file(id)?, user, now)?;
        let until = self.lock_duration.and_then(|d| now.checked_add_signed(d));

        let file = self.file_mut(id)?;
        file.is_locked = true;
        file.locked_by = Some(user.to_string());
        file.locked_until = until;
        tracing::info!("File {} locked by {}", id, user);
        Ok(file.clone())
    }

    /// Release the lock; releasing an unlocked file is a no-op
    pub fn unlock(&mut self, id: &str, user: &str) -> OpsResult<FileItem> {
        let now = Utc::now();
        let file = self.file_mut(id)?;
        match file.active_lock_holder(now) {
            Some(holder) if holder != user => {
                return Err(OpsError::NotLockHolder {
                    file_id: id.to_string(),
                    user: user.to_string(),
                })
            }
            _ => {}
        }
        file.is_locked = false;
        file.locked_by = None;
        file.locked_until = None;
        Ok(file.clone())
    }

    fn ensure_not_locked_by_other(&self, file: &FileItem, actor: &str, now: DateTime<Utc>) -> OpsResult<()> {
        match file.active_lock_holder(now) {
            Some(holder) if holder != actor => {
                tracing::warn!("Refused change to {}: locked by {}", file.id, holder);
                Err(OpsError::Locked {
                    file_id: file.id.clone(),
                    locked_by: holder.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_unique_file_name(&self, folder: Option<&str>, name: &str, except: Option<&str>) -> OpsResult<()> {
        let clash = self.files.values().any(|f| {
            f.folder_id.as_deref() == folder && f.name.eq_ignore_ascii_case(name) && Some(f.id.as_str()) != except
        });
        if clash {
            Err(OpsError::AlreadyExists {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn new_file(name: &str, size: u64, folder: Option<&str>) -> NewFile {
        NewFile {
            name: name.to_string(),
            size,
            folder_id: folder.map(str::to_string),
            owner: "alice".to_string(),
            permissions: Permission::Team,
            tags: vec![],
        }
    }

    fn store_with_tree() -> (FileStore, String, String) {
        let mut store = FileStore::new(Some(Duration::minutes(30)));
        let root = store
            .create_folder("Engineering", None, "alice", Permission::Team, None)
            .unwrap();
        let child = store
            .create_folder("Specs", Some(&root.id), "alice", Permission::Team, None)
            .unwrap();
        (store, root.id, child.id)
    }

    #[test]
    fn test_create_folder_builds_path() {
        let (mut store, root, child) = store_with_tree();
        assert_eq!(store.folder(&child).unwrap().path, vec!["Engineering", "Specs"]);
        assert_eq!(store.folder(&root).unwrap().item_count, 1);
        assert_eq!(store.folder(&root).unwrap().color, crate::models::default_color());

        let tinted = store
            .create_folder("Ops", None, "alice", Permission::Team, Some("#ef4444".into()))
            .unwrap();
        assert_eq!(tinted.color, "#ef4444");
    }

    #[test]
    fn test_duplicate_sibling_rejected() {
        let (mut store, root, _) = store_with_tree();
        let err = store
            .create_folder("specs", Some(&root), "bob", Permission::Team, None)
            .unwrap_err();
        assert!(matches!(err, OpsError::AlreadyExists { .. }));
        assert_ok!(store.create_folder("Specs", None, "bob", Permission::Team, None));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let mut store = FileStore::default();
        let err = store
            .create_folder("Orphan", Some("nope"), "bob", Permission::Team, None)
            .unwrap_err();
        assert!(matches!(err, OpsError::FolderNotFound(_)));
    }

    #[test]
    fn test_rename_cascades_paths() {
        let (mut store, root, child) = store_with_tree();
        let file = store.add_file(new_file("api.md", 10, Some(&child))).unwrap();
        assert_eq!(file.path, "/Engineering/Specs");

        store.rename_folder(&root, "Platform").unwrap();
        assert_eq!(store.folder(&child).unwrap().path, vec!["Platform", "Specs"]);
        assert_eq!(store.file(&file.id).unwrap().path, "/Platform/Specs");
    }

    #[test]
    fn test_move_folder_refuses_cycle() {
        let (mut store, root, child) = store_with_tree();
        let err = store.move_folder(&root, Some(&child)).unwrap_err();
        assert!(matches!(err, OpsError::CyclicMove { .. }));
        assert_err!(store.move_folder(&root, Some(&root)));

        let moved = store.move_folder(&child, None).unwrap();
        assert_eq!(moved.path, vec!["Specs"]);
        assert_eq!(store.folder(&root).unwrap().item_count, 0);
    }

    #[test]
    fn test_delete_folder_requires_recursive() {
        let (mut store, root, child) = store_with_tree();
        store.add_file(new_file("a.txt", 5, Some(&child))).unwrap();

        let err = store.delete_folder(&root, false, "alice").unwrap_err();
        assert!(matches!(err, OpsError::FolderNotEmpty { .. }));

        let deleted = store.delete_folder(&root, true, "alice").unwrap();
        assert_eq!(deleted, DeletedFolder { folders: 2, files: 1 });
        assert_eq!(store.folders().count(), 0);
        assert_eq!(store.files().count(), 0);
    }

    #[test]
    fn test_failed_update_leaves_folder_in_place() {
        let (mut store, root, child) = store_with_tree();
        let other = store
            .create_folder("Finance", None, "alice", Permission::Team, None)
            .unwrap();

        let bad_name = UpdateFolderRequest {
            name: Some("bad/name".into()),
            parent_id: Some(Some(other.id.clone())),
            ..Default::default()
        };
        assert_err!(store.update_folder(&child, bad_name));
        let folder = store.folder(&child).unwrap();
        assert_eq!(folder.parent_id.as_deref(), Some(root.as_str()));
        assert_eq!(folder.path, vec!["Engineering", "Specs"]);
        assert_eq!(store.folder(&other.id).unwrap().item_count, 0);

        store
            .create_folder("Plans", Some(&other.id), "alice", Permission::Team, None)
            .unwrap();
        let clash = UpdateFolderRequest {
            name: Some("plans".into()),
            parent_id: Some(Some(other.id.clone())),
            ..Default::default()
        };
        assert!(matches!(
            store.update_folder(&child, clash),
            Err(OpsError::AlreadyExists { .. })
        ));
        assert_eq!(store.folder(&child).unwrap().parent_id.as_deref(), Some(root.as_str()));
    }

    #[test]
    fn test_update_moves_and_renames_together() {
        let (mut store, root, child) = store_with_tree();
        let other = store
            .create_folder("Finance", None, "alice", Permission::Team, None)
            .unwrap();
        let req = UpdateFolderRequest {
            name: Some("Budgets".into()),
            parent_id: Some(Some(other.id.clone())),
            ..Default::default()
        };
        let updated = store.update_folder(&child, req).unwrap();
        assert_eq!(updated.path, vec!["Finance", "Budgets"]);
        assert_eq!(store.folder(&root).unwrap().item_count, 0);
        assert_eq!(store.folder(&other.id).unwrap().item_count, 1);
    }

    #[test]
    fn test_huge_sizes_do_not_overflow_folder_stats() {
        let (mut store, root, child) = store_with_tree();
        store.add_file(new_file("a.bin", u64::MAX, Some(&child))).unwrap();
        store.add_file(new_file("b.bin", 1, Some(&child))).unwrap();
        store.add_file(new_file("c.bin", 1, Some(&root))).unwrap();
        assert_eq!(store.folder(&child).unwrap().size, u64::MAX);
        assert_eq!(store.folder(&root).unwrap().size, u64::MAX);
        assert_eq!(store.files().count(), 3);
    }

    #[test]
    fn test_lock_with_unrepresentable_expiry_never_expires() {
        let mut store = FileStore::new(Some(Duration::days(200_000_000)));
        let file = store.add_file(new_file("a.txt", 1, None)).unwrap();
        let locked = store.lock(&file.id, "alice").unwrap();
        assert_eq!(locked.locked_until, None);
        assert!(matches!(store.lock(&file.id, "bob"), Err(OpsError::Locked { .. })));
    }

    #[test]
    fn test_stats_roll_up() {
        let (mut store, root, child) = store_with_tree();
        store.add_file(new_file("a.bin", 100, Some(&child))).unwrap();
        store.add_file(new_file("b.bin", 50, Some(&root))).unwrap();
        assert_eq!(store.folder(&child).unwrap().size, 100);
        let root_folder = store.folder(&root).unwrap();
        assert_eq!(root_folder.size, 150);
        assert_eq!(root_folder.item_count, 2);
    }

    #[test]
    fn test_toggle_star_twice_restores() {
        let mut store = FileStore::default();
        let file = store.add_file(new_file("x.png", 1, None)).unwrap();
        let original = file.starred;
        store.toggle_star(&file.id).unwrap();
        let after = store.toggle_star(&file.id).unwrap();
        assert_eq!(after, original);
    }

    #[test]
    fn test_versions_append() {
        let mut store = FileStore::default();
        let file = store.add_file(new_file("plan.docx", 10, None)).unwrap();
        let v = store
            .add_version(
                &file.id,
                "bob",
                AddVersionRequest {
                    file_size: 25,
                    comment: Some("review notes".into()),
                },
            )
            .unwrap();
        assert_eq!(v.version_number, "1.1");

        let file = store.file(&file.id).unwrap();
        assert_eq!(file.versions.len(), 2);
        assert_eq!(file.current_version().unwrap().id, v.id);
        assert_eq!(file.size, 25);
    }

    #[test]
    fn test_lock_blocks_other_users() {
        let mut store = FileStore::new(None);
        let file = store.add_file(new_file("budget.xlsx", 10, None)).unwrap();
        store.lock(&file.id, "alice").unwrap();

        assert!(matches!(store.lock(&file.id, "bob"), Err(OpsError::Locked { .. })));
        assert!(matches!(store.delete_file(&file.id, "bob"), Err(OpsError::Locked { .. })));
        assert!(matches!(store.unlock(&file.id, "bob"), Err(OpsError::NotLockHolder { .. })));
        assert_ok!(store.rename_file(&file.id, "budget-final.xlsx", "alice"));

        store.unlock(&file.id, "alice").unwrap();
        assert_ok!(store.delete_file(&file.id, "bob"));
    }

    #[test]
    fn test_rename_file_rederives_type() {
        let mut store = FileStore::default();
        let file = store.add_file(new_file("export.csv", 1, None)).unwrap();
        let renamed = store.rename_file(&file.id, "export.zip", "alice").unwrap();
        assert_eq!(renamed.extension, "zip");
        assert_eq!(renamed.file_type, crate::models::FileType::Archive);
    }

    #[test]
    fn test_move_file_updates_counts() {
        let (mut store, root, child) = store_with_tree();
        let file = store.add_file(new_file("a.txt", 7, Some(&root))).unwrap();
        store.move_file(&file.id, Some(&child), "alice").unwrap();
        assert_eq!(store.folder(&child).unwrap().item_count, 1);
        assert_eq!(store.folder(&root).unwrap().size, 7);
        assert_eq!(store.file(&file.id).unwrap().path, "/Engineering/Specs");
    }

    #[test]
    fn test_empty_comment_rejected() {
        let mut store = FileStore::default();
        let file = store.add_file(new_file("a.txt", 1, None)).unwrap();
        assert_err!(store.add_comment(&file.id, "bob", "   "));
        assert_eq!(store.add_comment(&file.id, "bob", " looks good ").unwrap().content, "looks good");
    }
}

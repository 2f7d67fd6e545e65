//! Breadcrumb trail reconstruction for the file browser

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::Folder;

pub const HOME_LABEL: &str = "Home";

/// One navigable segment. `id == None` is either Home or a segment that
/// could not be matched to a folder (rendered unclickable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub id: Option<String>,
    pub name: String,
}

impl Crumb {
    pub fn home() -> Self {
        Self {
            id: None,
            name: HOME_LABEL.to_string(),
        }
    }

    fn new(id: Option<&str>, name: &str) -> Self {
        Self {
            id: id.map(str::to_string),
            name: name.to_string(),
        }
    }
}

/// How a trail is rebuilt from the folder collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbStrategy {
    /// Follow `parent_id` links up to the root
    #[default]
    ParentChain,
    /// Match each segment of the stored `path` against folder paths
    PathMatch,
}

/// Rebuilds breadcrumb trails over a folder collection
pub struct BreadcrumbResolver<'a, I> {
    folders: I,
    strategy: BreadcrumbStrategy,
    _marker: std::marker::PhantomData<&'a Folder>,
}

impl<'a, I> BreadcrumbResolver<'a, I>
where
    I: Iterator<Item = &'a Folder> + Clone,
{
    pub fn new(folders: I, strategy: BreadcrumbStrategy) -> Self {
        Self {
            folders,
            strategy,
            _marker: std::marker::PhantomData,
        }
    }

    /// Trail from Home to `current_folder_id`.
    ///
    /// An unknown id yields just `[Home]`.
    pub fn resolve(&self, current_folder_id: Option<&str>) -> Vec<Crumb> {
        let mut trail = vec![Crumb::home()];
        let Some(current_id) = current_folder_id else {
            return trail;
        };
        let Some(current) = self.find(current_id) else {
            tracing::debug!("Breadcrumb lookup missed folder {}", current_id);
            return trail;
        };

        match self.strategy {
            BreadcrumbStrategy::PathMatch => trail.extend(self.by_path(current)),
            BreadcrumbStrategy::ParentChain => trail.extend(self.by_parent_chain(current)),
        }
        trail
    }

    fn find(&self, id: &str) -> Option<&'a Folder> {
        self.folders.clone().find(|f| f.id == id)
    }

    fn by_path(&self, current: &'a Folder) -> Vec<Crumb> {
        current
            .path
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let id = self
                    .folders
                    .clone()
                    .find(|f| f.path.len() == i + 1 && f.path.last() == Some(segment))
                    .map(|f| f.id.as_str());
                Crumb::new(id, segment)
            })
            .collect()
    }

    fn by_parent_chain(&self, current: &'a Folder) -> Vec<Crumb> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut cursor = Some(current);

        while let Some(folder) = cursor {
            if !seen.insert(folder.id.as_str()) {
                tracing::warn!("Folder parent cycle detected at {}", folder.id);
                break;
            }
            chain.push(Crumb::new(Some(folder.id.as_str()), &folder.name));
            cursor = folder.parent_id.as_deref().and_then(|pid| self.find(pid));
        }

        chain.reverse();
        chain
    }
}

/// Convenience wrapper over [`BreadcrumbResolver`] for a slice of folders
pub fn resolve_breadcrumbs(
    folders: &[Folder],
    current_folder_id: Option<&str>,
    strategy: BreadcrumbStrategy,
) -> Vec<Crumb> {
    BreadcrumbResolver::new(folders.iter(), strategy).resolve(current_folder_id)
}

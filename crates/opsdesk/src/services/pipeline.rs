//! Filter and sort pipeline for the file browser
//!
//! Restricts the folder and file collections to the direct children of the
//! current folder, applies the free-text search and type filter, and orders
//! the files by the selected comparator.

use serde::Serialize;
use std::cmp::Ordering;

use crate::models::{FileItem, FileQuery, Folder, SortField, SortOption};

/// Result of one pipeline evaluation
#[derive(Debug, Clone, Serialize)]
pub struct Listing<'a> {
    pub folders: Vec<&'a Folder>,
    pub files: Vec<&'a FileItem>,
}

pub struct FilterSortPipeline<'q> {
    query: &'q FileQuery,
    search: Option<String>,
}

impl<'q> FilterSortPipeline<'q> {
    pub fn new(query: &'q FileQuery) -> Self {
        let search = query.search.trim().to_lowercase();
        Self {
            query,
            search: (!search.is_empty()).then_some(search),
        }
    }

    /// Evaluate the pipeline over full collections
    pub fn run<'a, F, I>(&self, folders: F, files: I) -> Listing<'a>
    where
        F: IntoIterator<Item = &'a Folder>,
        I: IntoIterator<Item = &'a FileItem>,
    {
        let folders = self.filter_folders(folders);
        let mut files = self.filter_files(files);
        sort_files(&mut files, self.query.sort);
        tracing::debug!(
            folder = ?self.query.current_folder_id,
            folders = folders.len(),
            files = files.len(),
            "Evaluated file listing"
        );
        Listing { folders, files }
    }

    /// Direct child folders of the current folder that match the search
    pub fn filter_folders<'a, F>(&self, folders: F) -> Vec<&'a Folder>
    where
        F: IntoIterator<Item = &'a Folder>,
    {
        let parent = self.query.current_folder_id.as_deref();
        folders
            .into_iter()
            .filter(|f| f.parent_id.as_deref() == parent)
            .filter(|f| self.matches_search(&f.name))
            .collect()
    }

    /// Direct child files that match search, type, star and tag filters
    pub fn filter_files<'a, I>(&self, files: I) -> Vec<&'a FileItem>
    where
        I: IntoIterator<Item = &'a FileItem>,
    {
        let parent = self.query.current_folder_id.as_deref();
        files
            .into_iter()
            .filter(|f| f.folder_id.as_deref() == parent)
            .filter(|f| self.matches_search(&f.name))
            .filter(|f| self.query.file_type.map_or(true, |t| f.file_type == t))
            .filter(|f| !self.query.starred_only || f.starred)
            .filter(|f| self.query.tag.as_deref().map_or(true, |t| f.has_tag(t)))
            .collect()
    }

    fn matches_search(&self, name: &str) -> bool {
        match &self.search {
            None => true,
            Some(q) => name.to_lowercase().contains(q.as_str()),
        }
    }
}

/// Stable in-place sort; ties keep their input order in both directions
pub fn sort_files(files: &mut [&FileItem], sort: SortOption) {
    files.sort_by(|a, b| sort.direction.apply(compare_files(a, b, sort.field)));
}

/// Ascending comparator for one sort field
pub fn compare_files(a: &FileItem, b: &FileItem, field: SortField) -> Ordering {
    match field {
        SortField::Name => locale_cmp(&a.name, &b.name),
        SortField::Type => locale_cmp(a.file_type.as_str(), b.file_type.as_str()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Size => a.size.cmp(&b.size),
    }
}

/// Case-folded comparison with the raw strings as tiebreak
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileType, Permission, SortDirection};
    use chrono::{Duration, Utc};

    fn file(id: &str, name: &str, size: u64, folder: Option<&str>) -> FileItem {
        let mut f = FileItem::new(name.into(), size, "alice".into(), Permission::Team).with_id(id);
        f.folder_id = folder.map(str::to_string);
        f
    }

    fn ids(files: &[&FileItem]) -> Vec<String> {
        files.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_sort_example() {
        let files = vec![file("a", "Zeta.pdf", 100, None), file("b", "Alpha.docx", 50, None)];

        let query = FileQuery::in_folder(None, SortOption::ascending(SortField::Name));
        let listing = FilterSortPipeline::new(&query).run(&[] as &[Folder], &files);
        assert_eq!(ids(&listing.files), vec!["b", "a"]);

        let query = FileQuery::in_folder(None, SortOption::descending(SortField::Size));
        let listing = FilterSortPipeline::new(&query).run(&[] as &[Folder], &files);
        assert_eq!(ids(&listing.files), vec!["a", "b"]);
    }

    #[test]
    fn test_reverse_direction_reverses_order() {
        let base = Utc::now();
        let mut files: Vec<FileItem> = ["delta.txt", "Alpha.png", "charlie.rs", "bravo.zip"]
            .iter()
            .enumerate()
            .map(|(i, name)| file(&i.to_string(), name, (i as u64 + 1) * 10, None))
            .collect();
        for (i, f) in files.iter_mut().enumerate() {
            f.created_at = base - Duration::hours(i as i64);
            f.updated_at = base + Duration::minutes(i as i64 * 7 % 5);
        }

        for field in [
            SortField::Name,
            SortField::Size,
            SortField::CreatedAt,
            SortField::UpdatedAt,
            SortField::Type,
        ] {
            let mut asc: Vec<&FileItem> = files.iter().collect();
            let mut desc: Vec<&FileItem> = files.iter().collect();
            sort_files(&mut asc, SortOption::new(field, SortDirection::Asc));
            sort_files(&mut desc, SortOption::new(field, SortDirection::Desc));
            desc.reverse();
            assert_eq!(ids(&asc), ids(&desc), "field {:?}", field);
        }
    }

    #[test]
    fn test_type_filter() {
        let files = vec![
            file("1", "logo.png", 1, None),
            file("2", "notes.docx", 1, None),
            file("3", "photo.jpg", 1, None),
        ];
        let query = FileQuery::in_folder(None, SortOption::ascending(SortField::Name))
            .with_type(Some(FileType::Image));
        let listing = FilterSortPipeline::new(&query).run(&[] as &[Folder], &files);
        assert!(listing.files.iter().all(|f| f.file_type == FileType::Image));
        assert_eq!(listing.files.len(), 2);

        let query = query.with_type(None);
        let listing = FilterSortPipeline::new(&query).run(&[] as &[Folder], &files);
        assert_eq!(listing.files.len(), 3);
    }

    #[test]
    fn test_only_direct_children_and_case_insensitive_search() {
        let mut root = Folder::new("Root".into(), None, "alice".into(), Permission::Team).with_id("r");
        root.path = vec!["Root".into()];
        let sub = Folder::new("Reports".into(), Some(&root), "alice".into(), Permission::Team);
        let folders = vec![root, sub];
        let files = vec![
            file("1", "Budget REPORT.xlsx", 1, Some("r")),
            file("2", "report-draft.docx", 1, None),
            file("3", "roadmap.pptx", 1, Some("r")),
        ];

        let query = FileQuery::in_folder(Some("r".into()), SortOption::ascending(SortField::Name))
            .with_search("  report ");
        let listing = FilterSortPipeline::new(&query).run(&folders, &files);
        assert_eq!(ids(&listing.files), vec!["1"]);
        assert_eq!(listing.folders.len(), 1);
        assert_eq!(listing.folders[0].name, "Reports");

        let query = FileQuery::in_folder(None, SortOption::ascending(SortField::Name));
        let listing = FilterSortPipeline::new(&query).run(&folders, &files);
        assert_eq!(listing.folders.len(), 1);
        assert_eq!(listing.folders[0].id, "r");
        assert_eq!(ids(&listing.files), vec!["2"]);
    }

    #[test]
    fn test_starred_and_tag_filters() {
        let mut a = file("a", "a.txt", 1, None).with_tags(["Finance"]);
        a.starred = true;
        let b = file("b", "b.txt", 1, None).with_tags(["ops"]);
        let files = vec![a, b];

        let mut query = FileQuery::in_folder(None, SortOption::ascending(SortField::Name));
        query.starred_only = true;
        assert_eq!(ids(&FilterSortPipeline::new(&query).run(&[] as &[Folder], &files).files), vec!["a"]);

        query.starred_only = false;
        query.tag = Some("finance".into());
        assert_eq!(ids(&FilterSortPipeline::new(&query).run(&[] as &[Folder], &files).files), vec!["a"]);
    }

    #[test]
    fn test_locale_cmp_folds_case() {
        assert_eq!(locale_cmp("alpha", "Beta"), Ordering::Less);
        assert_eq!(locale_cmp("Beta", "alpha"), Ordering::Greater);
        assert_ne!(locale_cmp("a", "A"), Ordering::Equal);
    }
}

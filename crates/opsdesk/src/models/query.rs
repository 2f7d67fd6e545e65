//! Listing query types shared by the pipeline and the HTTP layer

use serde::{Deserialize, Serialize};

use super::FileType;

/// Field a file listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    CreatedAt,
    UpdatedAt,
    Size,
    #[serde(rename = "type")]
    Type,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" | "date" => Ok(SortField::UpdatedAt),
            "size" => Ok(SortField::Size),
            "type" => Ok(SortField::Type),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction multiplier to an ascending ordering
    pub fn apply(self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOption {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Presentation strategy for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

/// Everything the filter/sort pipeline needs besides the collections
#[derive(Debug, Clone)]
pub struct FileQuery {
    pub current_folder_id: Option<String>,
    pub search: String,
    pub file_type: Option<FileType>,
    pub sort: SortOption,
    pub starred_only: bool,
    pub tag: Option<String>,
}

impl FileQuery {
    /// Unfiltered listing of `folder` sorted by `sort`
    pub fn in_folder(folder: Option<String>, sort: SortOption) -> Self {
        Self {
            current_folder_id: folder,
            search: String::new(),
            file_type: None,
            sort,
            starred_only: false,
            tag: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_type(mut self, file_type: Option<FileType>) -> Self {
        self.file_type = file_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_wire_names() {
        assert_eq!(serde_json::to_string(&SortField::CreatedAt).unwrap(), "\"createdAt\"");
        assert_eq!(serde_json::to_string(&SortField::Type).unwrap(), "\"type\"");
        assert_eq!("updatedAt".parse::<SortField>().unwrap(), SortField::UpdatedAt);
        assert!("owner".parse::<SortField>().is_err());
    }

    #[test]
    fn test_direction_apply() {
        use std::cmp::Ordering;
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
    }
}

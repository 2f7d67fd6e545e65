//! File item model with version history and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Permission;

/// Coarse file category used for icons and the type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Document,
    Image,
    Video,
    Audio,
    Code,
    Pdf,
    Archive,
    Spreadsheet,
    Presentation,
}

impl FileType {
    pub const ALL: [FileType; 9] = [
        FileType::Document,
        FileType::Image,
        FileType::Video,
        FileType::Audio,
        FileType::Code,
        FileType::Pdf,
        FileType::Archive,
        FileType::Spreadsheet,
        FileType::Presentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Document => "document",
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Code => "code",
            FileType::Pdf => "pdf",
            FileType::Archive => "archive",
            FileType::Spreadsheet => "spreadsheet",
            FileType::Presentation => "presentation",
        }
    }

    /// Classify by extension first, then by the MIME top-level type
    pub fn detect(extension: &str, mime_type: &str) -> FileType {
        match extension.to_lowercase().as_str() {
            "pdf" => return FileType::Pdf,
            "xls" | "xlsx" | "csv" | "ods" | "numbers" => return FileType::Spreadsheet,
            "ppt" | "pptx" | "odp" | "key" => return FileType::Presentation,
            "zip" | "tar" | "gz" | "tgz" | "rar" | "7z" | "bz2" | "xz" => return FileType::Archive,
            "rs" | "py" | "js" | "ts" | "tsx" | "jsx" | "go" | "java" | "c" | "h" | "cpp"
            | "sh" | "json" | "yaml" | "yml" | "toml" | "sql" | "html" | "css" | "tf" => {
                return FileType::Code
            }
            _ => {}
        }
        match mime_type.split('/').next().unwrap_or_default() {
            "image" => FileType::Image,
            "video" => FileType::Video,
            "audio" => FileType::Audio,
            _ => FileType::Document,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        FileType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("Invalid file type: {}", s))
    }
}

/// One immutable entry in a file's version history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub version_number: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Version {
    pub fn new(version_number: String, uploaded_by: String, file_size: u64, comment: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            version_number,
            uploaded_by,
            uploaded_at: Utc::now(),
            file_size,
            comment,
        }
    }
}

/// Comment left on a file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileComment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl FileComment {
    pub fn new(author: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author,
            content,
            created_at: Utc::now(),
        }
    }
}

/// File stored in the repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub mime_type: String,
    pub extension: String,
    pub size: u64,
    pub folder_id: Option<String>,
    /// Display path of the containing folder ("/" at the root)
    pub path: String,
    pub owner: String,
    pub permissions: Permission,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub starred: bool,
    pub versions: Vec<Version>,
    #[serde(default)]
    pub comments: Vec<FileComment>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl FileItem {
    /// Build a file with its first version ("1.0").
    ///
    /// Extension, MIME type and category are derived from `name`.
    pub fn new(name: String, size: u64, owner: String, permissions: Permission) -> Self {
        let now = Utc::now();
        let extension = extension_of(&name);
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_type = FileType::detect(&extension, &mime_type);
        let first = Version::new("1.0".to_string(), owner.clone(), size, None);
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            file_type,
            mime_type,
            extension,
            size,
            folder_id: None,
            path: "/".to_string(),
            owner,
            permissions,
            tags: Vec::new(),
            starred: false,
            versions: vec![first],
            comments: Vec::new(),
            is_locked: false,
            locked_by: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The version currently in effect
    pub fn current_version(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Lock holder, ignoring locks that expired before `now`
    pub fn active_lock_holder(&self, now: DateTime<Utc>) -> Option<&str> {
        if !self.is_locked {
            return None;
        }
        match self.locked_until {
            Some(until) if until <= now => None,
            _ => self.locked_by.as_deref(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Lowercased extension without the dot, empty when there is none
pub fn extension_of(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Request to add a file to the repository
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileRequest {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub permissions: Option<Permission>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to rename or move a file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` moves the file to the root
    #[serde(default, deserialize_with = "super::folder::double_option::deserialize")]
    pub folder_id: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Request to upload a new version; the uploader is the acting user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVersionRequest {
    pub file_size: u64,
    #[serde(default)]
    pub comment: Option<String>,
}

//! Data models for the dashboard

mod file;
mod folder;
mod notification;
mod query;
mod request;

pub use file::*;
pub use folder::*;
pub use notification::*;
pub use query::*;
pub use request::*;

/// Sharing scope of a folder or file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Private,
    Team,
    Department,
    Organization,
    Public,
}

impl Default for Permission {
    fn default() -> Self {
        Permission::Private
    }
}

impl Permission {
    /// Anything wider than private counts as shared
    pub fn is_shared(&self) -> bool {
        !matches!(self, Permission::Private)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Private => write!(f, "private"),
            Permission::Team => write!(f, "team"),
            Permission::Department => write!(f, "department"),
            Permission::Organization => write!(f, "organization"),
            Permission::Public => write!(f, "public"),
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Permission::Private),
            "team" => Ok(Permission::Team),
            "department" => Ok(Permission::Department),
            "organization" => Ok(Permission::Organization),
            "public" => Ok(Permission::Public),
            _ => Err(format!("Invalid permission: {}", s)),
        }
    }
}

/// Increment the minor part of a `major.minor` version label ("1.0" -> "1.1")
pub fn next_version_number(version: &str) -> String {
    if let Some((prefix, minor)) = version.rsplit_once('.') {
        if let Ok(n) = minor.parse::<u64>() {
            return format!("{}.{}", prefix, n + 1);
        }
    }
    format!("{}.1", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_number() {
        assert_eq!(next_version_number("1.0"), "1.1");
        assert_eq!(next_version_number("2.9"), "2.10");
        assert_eq!(next_version_number("1.2.3"), "1.2.4");
        assert_eq!(next_version_number("draft"), "draft.1");
    }

    #[test]
    fn test_permission_roundtrip_and_sharing() {
        assert_eq!("Department".parse::<Permission>().unwrap(), Permission::Department);
        assert!("everyone".parse::<Permission>().is_err());
        assert!(!Permission::Private.is_shared());
        assert!(Permission::Team.is_shared());
    }
}

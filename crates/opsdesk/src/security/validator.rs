//! Name validation for folders, files and tags

use crate::error::{OpsError, OpsResult};
use regex::Regex;
use std::sync::LazyLock;

/// Characters that are never allowed in a folder or file name
static FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"|?*\x00-\x1f]"#).expect("static regex"));

/// Valid tag pattern: lowercase words joined by hyphens
static VALID_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("static regex"));

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const MAX_NAME_LEN: usize = 255;

/// Validate a folder or file name.
///
/// Spaces are fine; path separators, traversal sequences, control
/// characters and reserved device names are not.
pub fn validate_item_name(name: &str) -> OpsResult<()> {
    let invalid = || OpsError::InvalidName {
        name: name.to_string(),
    };

    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed != name {
        return Err(invalid());
    }

    if name == "." || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(invalid());
    }

    if FORBIDDEN_CHARS.is_match(name) {
        return Err(invalid());
    }

    let upper = name.to_uppercase();
    let base = upper.split('.').next().unwrap_or(&upper);
    if RESERVED_NAMES.contains(&base) {
        return Err(invalid());
    }

    if name.len() > MAX_NAME_LEN {
        return Err(invalid());
    }

    Ok(())
}

/// Normalize and validate a tag ("Q3 Budget" is rejected, "q3-budget" passes)
pub fn normalize_tag(tag: &str) -> OpsResult<String> {
    let tag = tag.trim().to_lowercase();
    if VALID_TAG.is_match(&tag) && tag.len() <= 64 {
        Ok(tag)
    } else {
        Err(OpsError::Validation(format!("Invalid tag: {}", tag)))
    }
}

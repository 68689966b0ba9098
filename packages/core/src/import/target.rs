//! Import mode and target parameters
//!
//! Requests carry the mode as `"merge" | "replace"` and the target as
//! `"auto" | "menu:<id>"`. Apply requests split the target into
//! `targetType` and `targetMenuId`; [`ImportTarget::from_parts`] accepts that
//! form.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Malformed mode or target parameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid import target: {0:?} (expected \"auto\" or \"menu:<id>\")")]
    InvalidTarget(String),

    #[error("Invalid import mode: {0:?} (expected \"merge\" or \"replace\")")]
    InvalidMode(String),
}

/// Whether existing content under the affected menus is kept or wiped first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Merge,
    Replace,
}

impl ImportMode {
    pub fn parse(value: &str) -> Result<Self, TargetError> {
        match value.trim() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => Err(TargetError::InvalidMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Replace => "replace",
        }
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Self::Replace)
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where imported bookmarks land
///
/// Serialized in its string form (`"auto"` or `"menu:<id>"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImportTarget {
    #[default]
    Auto,
    Menu(i64),
}

impl ImportTarget {
    pub fn parse(value: &str) -> Result<Self, TargetError> {
        let value = value.trim();
        if value == "auto" {
            return Ok(Self::Auto);
        }
        value
            .strip_prefix("menu:")
            .and_then(|id| id.parse::<i64>().ok())
            .map(Self::Menu)
            .ok_or_else(|| TargetError::InvalidTarget(value.to_string()))
    }

    /// Build from the split `targetType` / `targetMenuId` form
    pub fn from_parts(target_type: &str, menu_id: Option<i64>) -> Result<Self, TargetError> {
        match (target_type.trim(), menu_id) {
            ("auto", _) => Ok(Self::Auto),
            ("menu", Some(id)) => Ok(Self::Menu(id)),
            ("menu", None) => Err(TargetError::InvalidTarget("menu".to_string())),
            (other, _) => Err(TargetError::InvalidTarget(other.to_string())),
        }
    }

    pub fn target_type(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Menu(_) => "menu",
        }
    }

    pub fn menu_id(&self) -> Option<i64> {
        match self {
            Self::Auto => None,
            Self::Menu(id) => Some(*id),
        }
    }
}

impl fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Menu(id) => write!(f, "menu:{}", id),
        }
    }
}

impl TryFrom<String> for ImportTarget {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImportTarget> for String {
    fn from(target: ImportTarget) -> Self {
        target.to_string()
    }
}

//! Service Layer Error Types
//!
//! Every validation failure of an import request has its own variant so
//! callers can tell them apart; storage failures pass through transparently.

use crate::import::TargetError;
use thiserror::Error;

/// Import request errors
///
/// Any of these rejects the whole request. Per-bookmark parse problems and
/// per-card resolution problems are not errors at this level; they travel in
/// the response payloads.
#[derive(Error, Debug)]
pub enum ImportServiceError {
    /// No file supplied with the request
    #[error("No bookmark file was uploaded")]
    MissingFile,

    /// Upload exceeds the configured size limit
    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: usize, max: usize },

    /// Content too short to be a bookmark export
    #[error("File is empty or invalid")]
    EmptyFile,

    /// Parsing recovered nothing
    #[error("No bookmarks found in file")]
    NoBookmarks { errors: Vec<String> },

    /// Malformed target parameter
    #[error("Invalid import target: {0}")]
    InvalidTarget(String),

    /// Malformed mode parameter
    #[error("Invalid import mode: {0}")]
    InvalidMode(String),

    /// Target references a menu that does not exist
    #[error("Target menu not found: {id}")]
    UnknownTargetMenu { id: i64 },

    /// Service configured with invalid settings
    #[error("Invalid import configuration: {0}")]
    InvalidConfig(String),

    /// Storage failure while reading the snapshot or applying a plan
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl ImportServiceError {
    pub fn file_too_large(size: usize, max: usize) -> Self {
        Self::FileTooLarge { size, max }
    }

    pub fn unknown_target_menu(id: i64) -> Self {
        Self::UnknownTargetMenu { id }
    }

    /// Whether the request itself was at fault (as opposed to storage)
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Persistence(_) | Self::InvalidConfig(_))
    }
}

impl From<TargetError> for ImportServiceError {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::InvalidTarget(value) => Self::InvalidTarget(value),
            TargetError::InvalidMode(value) => Self::InvalidMode(value),
        }
    }
}

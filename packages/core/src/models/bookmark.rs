//! Parsed bookmark records
//!
//! A `BookmarkRecord` is the ephemeral output of the bookmark HTML parser:
//! one record per anchor that carried a usable `http(s)` URL, annotated with
//! the folder path it was found under.

use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of titles and folder names
pub const MAX_TITLE_LENGTH: usize = 500;

/// Maximum length (in characters) of bookmark URLs
pub const MAX_URL_LENGTH: usize = 2048;

/// A single bookmark recovered from the export markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    /// Display text; falls back to the URL when the anchor text is empty
    pub title: String,

    /// Absolute `http://` or `https://` URL
    pub url: String,

    /// Top-level folder the bookmark lives under (`None` for loose bookmarks)
    pub root_folder: Option<String>,

    /// Sub-folder names beneath `root_folder`, outermost first
    pub folder_path: Vec<String>,

    /// Document-order sequence number, used only as a stable tie-break
    pub order: usize,
}

impl BookmarkRecord {
    /// Full folder path including the root folder as first segment
    pub fn full_path(&self) -> Vec<&str> {
        self.root_folder
            .iter()
            .map(String::as_str)
            .chain(self.folder_path.iter().map(String::as_str))
            .collect()
    }

    /// Whether the bookmark sits directly under the toolbar/root
    pub fn is_loose(&self) -> bool {
        self.root_folder.is_none() && self.folder_path.is_empty()
    }
}

/// Result of parsing one bookmark export
///
/// Parsing never fails outright; anything that could not be recovered is
/// reported in `errors` alongside whatever bookmarks were extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub bookmarks: Vec<BookmarkRecord>,

    /// Folders opened directly under the toolbar folder, in first-seen order
    pub root_folders: Vec<String>,

    /// Non-fatal parse errors in the order they were encountered
    pub errors: Vec<String>,
}

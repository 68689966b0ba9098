//! Configuration for the bookmark import pipeline

use crate::import::{PlannerOptions, DEFAULT_FALLBACK_MENU, DEFAULT_GROUP_SEPARATOR, MAX_BATCH_SIZE};
use serde::{Deserialize, Serialize};

/// Largest accepted upload (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Trimmed content shorter than this cannot be a bookmark export
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 10;

pub const DEFAULT_SAMPLE_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Uploads larger than this are rejected before parsing
    pub max_file_size: usize,

    /// Trimmed content shorter than this is treated as empty or invalid
    pub min_content_length: usize,

    /// Statements per executor batch
    pub batch_size: usize,

    /// Auto-mode menu for bookmarks outside any folder
    pub fallback_menu_name: String,

    /// Joins folder path segments into a group name
    pub group_separator: String,

    /// Number of sample bookmarks in the preview summary
    pub sample_limit: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            batch_size: MAX_BATCH_SIZE,
            fallback_menu_name: DEFAULT_FALLBACK_MENU.to_string(),
            group_separator: DEFAULT_GROUP_SEPARATOR.to_string(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

impl ImportConfig {
    /// Defaults overlaid with `NAVHUB_*` environment variables
    ///
    /// - `NAVHUB_MAX_FILE_SIZE` (bytes)
    /// - `NAVHUB_BATCH_SIZE`
    /// - `NAVHUB_FALLBACK_MENU`
    /// - `NAVHUB_SAMPLE_LIMIT`
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let read_usize = |key: &str, target: &mut usize| {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse::<usize>() {
                    Ok(value) => *target = value,
                    Err(_) => tracing::warn!(key, value = %raw, "Ignoring non-numeric setting"),
                }
            }
        };

        read_usize("NAVHUB_MAX_FILE_SIZE", &mut config.max_file_size);
        read_usize("NAVHUB_BATCH_SIZE", &mut config.batch_size);
        read_usize("NAVHUB_SAMPLE_LIMIT", &mut config.sample_limit);

        if let Some(name) = lookup("NAVHUB_FALLBACK_MENU") {
            config.fallback_menu_name = name;
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_size == 0 {
            return Err("max_file_size must be greater than 0".to_string());
        }

        if self.min_content_length > self.max_file_size {
            return Err("min_content_length cannot exceed max_file_size".to_string());
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(format!(
                "batch_size must be between 1 and {}",
                MAX_BATCH_SIZE
            ));
        }

        if self.fallback_menu_name.trim().is_empty() {
            return Err("fallback_menu_name cannot be empty".to_string());
        }

        if self.group_separator.is_empty() {
            return Err("group_separator cannot be empty".to_string());
        }

        Ok(())
    }

    /// Naming options handed to the planner
    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            fallback_menu_name: self.fallback_menu_name.clone(),
            group_separator: self.group_separator.clone(),
        }
    }
}

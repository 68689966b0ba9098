//! Bookmark Import Pipeline
//!
//! `parse -> snapshot -> plan -> (preview) -> execute`
//!
//! - [`parser`] - Netscape bookmark HTML into `BookmarkRecord`s
//! - [`planner`] - reconcile bookmarks against a destination snapshot
//! - [`executor`] - apply a plan to a `NavStore`
//! - [`summary`] - human-oriented preview digest
//! - [`target`] - request-level mode and target parameters
//!
//! Parsing and planning are pure and synchronous; only the executor does I/O.

pub mod executor;
pub mod parser;
pub mod planner;
pub mod summary;
pub mod target;

pub use executor::{ExecutionReport, PlanExecutor, MAX_BATCH_SIZE};
pub use parser::{
    decode_html_entities, parse_bookmark_html, sanitize_text, sanitize_url, ParseIssue,
    MAX_FOLDER_DEPTH,
};
pub use planner::{
    generate_import_plan, PlanRequest, PlanTarget, PlannerOptions, DEFAULT_FALLBACK_MENU,
    DEFAULT_GROUP_SEPARATOR,
};
pub use summary::{GroupSummary, ImportSummary, MenuSummary, SampleBookmark};
pub use target::{ImportMode, ImportTarget, TargetError};

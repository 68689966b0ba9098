//! NavHub Core - Bookmark Import
//!
//! Imports browser bookmark exports (Netscape bookmark HTML) into NavHub's
//! navigation hierarchy of menus, groups (sub-menus) and cards.
//!
//! # Architecture
//!
//! - **Two-phase import**: `preview` computes a plan without touching storage,
//!   `apply` executes that plan exactly as returned
//! - **Pure core**: parsing and planning are synchronous functions over
//!   in-memory data; all I/O sits behind the [`db::NavStore`] trait
//! - **libsql/Turso**: embedded SQLite-compatible storage
//!
//! # Modules
//!
//! - [`models`] - Parsed bookmarks, import plans, destination records
//! - [`import`] - Parser, planner, executor and preview summary
//! - [`db`] - Database layer with libsql integration
//! - [`services`] - Request-level import entry points
//! - [`config`] - Import limits and naming options

pub mod config;
pub mod db;
pub mod import;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::ImportConfig;
pub use models::*;
pub use services::*;

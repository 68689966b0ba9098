//! Database Layer
//!
//! Persistence for menus, groups (`sub_menus`) and cards using libsql:
//!
//! - [`DatabaseService`] - connection management, schema and raw SQL
//! - [`NavStore`] - the storage abstraction the import pipeline depends on
//! - [`TursoStore`] - `NavStore` over `DatabaseService`

mod database;
mod error;
mod nav_store;
mod turso_store;

pub use database::DatabaseService;
pub use error::{DatabaseError, StoreOperation};
pub use nav_store::NavStore;
pub use turso_store::TursoStore;

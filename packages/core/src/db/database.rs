//! Database Connection Management
//!
//! This module provides the database connection and schema initialization
//! for NavHub's navigation store using libsql.
//!
//! # Schema
//!
//! - `menus` - top-level navigation categories
//! - `sub_menus` - groups, each scoped to one parent menu
//! - `cards` - bookmarks attached to a menu, a sub-menu, or both
//!
//! Cards created under a sub-menu by older seed data carry a NULL `menu_id`;
//! queries that need a card's menu resolve it through the sub-menu's parent.
//!
//! # Database Connection Patterns
//!
//! **Use `connect_with_timeout()` in async functions.** It sets a 5-second
//! busy timeout and enables foreign keys on the connection, both of which are
//! per-connection settings in SQLite.
//!
//! ```no_run
//! # use navhub_core::db::DatabaseService;
//! # use std::path::PathBuf;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db_service = DatabaseService::new(PathBuf::from("./data/navhub.db")).await?;
//! let conn = db_service.connect_with_timeout().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::error::{DatabaseError, StoreOperation};
use crate::models::WriteStatement;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

const SELECT_CARD_URLS: &str = "SELECT COALESCE(c.menu_id, s.parent_id) AS owner_menu_id, c.sub_menu_id, c.url
     FROM cards c
     LEFT JOIN sub_menus s ON s.id = c.sub_menu_id
     WHERE COALESCE(c.menu_id, s.parent_id) IS NOT NULL";

/// Database service for managing the libsql connection and schema
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Open (or create) the database at `db_path` and initialize the schema
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - The path is empty
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        if db_path.as_os_str().is_empty() {
            return Err(DatabaseError::unusable_path(db_path, "path is empty"));
        }

        let is_new_database = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::unusable_path(
                        db_path.clone(),
                        format!("cannot create {}: {}", parent.display(), e),
                    )
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|source| DatabaseError::OpenFailed {
                path: db_path.clone(),
                source,
            })?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        tracing::debug!(path = %service.db_path.display(), is_new_database, "Database ready");

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of execute().
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &'static str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn
            .prepare(pragma)
            .await
            .map_err(DatabaseError::pragma(pragma))?;
        let _ = stmt.query(()).await.map_err(DatabaseError::pragma(pragma))?;
        Ok(())
    }

    /// Create tables and indexes (idempotent)
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        let tables = [
            (
                "menus",
                r#"CREATE TABLE IF NOT EXISTS menus (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    "order" INTEGER NOT NULL DEFAULT 0
                )"#,
            ),
            (
                "sub_menus",
                r#"CREATE TABLE IF NOT EXISTS sub_menus (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    parent_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    "order" INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (parent_id) REFERENCES menus(id) ON DELETE CASCADE
                )"#,
            ),
            (
                "cards",
                r#"CREATE TABLE IF NOT EXISTS cards (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    menu_id INTEGER,
                    sub_menu_id INTEGER,
                    title TEXT NOT NULL,
                    url TEXT NOT NULL,
                    logo_url TEXT,
                    custom_logo_path TEXT,
                    "desc" TEXT,
                    "order" INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (menu_id) REFERENCES menus(id) ON DELETE CASCADE,
                    FOREIGN KEY (sub_menu_id) REFERENCES sub_menus(id) ON DELETE CASCADE
                )"#,
            ),
        ];

        for (name, sql) in tables {
            conn.execute(sql, ())
                .await
                .map_err(DatabaseError::schema(name))?;
        }

        let indexes = [
            (
                "idx_sub_menus_parent",
                "CREATE INDEX IF NOT EXISTS idx_sub_menus_parent ON sub_menus(parent_id)",
            ),
            (
                "idx_cards_menu",
                "CREATE INDEX IF NOT EXISTS idx_cards_menu ON cards(menu_id)",
            ),
            (
                "idx_cards_sub_menu",
                "CREATE INDEX IF NOT EXISTS idx_cards_sub_menu ON cards(sub_menu_id)",
            ),
        ];

        for (name, sql) in indexes {
            conn.execute(sql, ())
                .await
                .map_err(DatabaseError::schema(name))?;
        }

        Ok(())
    }

    /// Get a raw connection (synchronous contexts only)
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        Ok(self.db.connect()?)
    }

    /// Get an async connection with busy timeout and foreign keys enabled
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        // Returns no rows, so execute() is fine here
        const FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON";
        conn.execute(FOREIGN_KEYS, ())
            .await
            .map_err(DatabaseError::pragma(FOREIGN_KEYS))?;

        Ok(conn)
    }

    //
    // NAV STORE OPERATIONS
    // Raw SQL, wrapped by the NavStore implementation in turso_store.rs.
    //

    /// All menus as `(id, name)` rows ordered by display order then id
    pub async fn db_list_menus(&self) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        conn.query(r#"SELECT id, name FROM menus ORDER BY "order", id"#, ())
            .await
            .map_err(DatabaseError::statement(StoreOperation::List, "menus"))
    }

    /// A single menu as an `(id, name)` row
    pub async fn db_get_menu(&self, id: i64) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        let mut rows = conn
            .query("SELECT id, name FROM menus WHERE id = ?", [id])
            .await
            .map_err(DatabaseError::statement(StoreOperation::Read, "menus"))?;

        rows.next()
            .await
            .map_err(DatabaseError::statement(StoreOperation::Read, "menus"))
    }

    /// Sub-menus as `(id, parent_id, name)` rows, optionally for one menu
    pub async fn db_list_groups(
        &self,
        menu_id: Option<i64>,
    ) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        let result = match menu_id {
            Some(menu_id) => {
                conn.query(
                    r#"SELECT id, parent_id, name FROM sub_menus WHERE parent_id = ? ORDER BY "order", id"#,
                    [menu_id],
                )
                .await
            }
            None => {
                conn.query(
                    r#"SELECT id, parent_id, name FROM sub_menus ORDER BY parent_id, "order", id"#,
                    (),
                )
                .await
            }
        };
        result.map_err(DatabaseError::statement(StoreOperation::List, "sub_menus"))
    }

    /// Card `(menu_id, sub_menu_id, url)` rows, optionally for one menu
    pub async fn db_list_card_urls(
        &self,
        menu_id: Option<i64>,
    ) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        let result = match menu_id {
            Some(menu_id) => {
                conn.query(
                    &format!(
                        "{} AND COALESCE(c.menu_id, s.parent_id) = ? ORDER BY c.id",
                        SELECT_CARD_URLS
                    ),
                    [menu_id],
                )
                .await
            }
            None => {
                conn.query(&format!("{} ORDER BY c.id", SELECT_CARD_URLS), ())
                    .await
            }
        };
        result.map_err(DatabaseError::statement(StoreOperation::List, "cards"))
    }

    /// Delete every card under a menu, including cards stored only by sub-menu
    pub async fn db_delete_cards_for_menu(&self, menu_id: i64) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        conn.execute(
            "DELETE FROM cards
             WHERE menu_id = ?1
                OR sub_menu_id IN (SELECT id FROM sub_menus WHERE parent_id = ?1)",
            [menu_id],
        )
        .await
        .map_err(DatabaseError::statement(StoreOperation::Delete, "cards"))
    }

    /// Delete every sub-menu under a menu
    pub async fn db_delete_groups_for_menu(&self, menu_id: i64) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        conn.execute("DELETE FROM sub_menus WHERE parent_id = ?", [menu_id])
            .await
            .map_err(DatabaseError::statement(StoreOperation::Delete, "sub_menus"))
    }

    /// Run one insert on `conn` and return the generated row id
    async fn insert_on(
        conn: &libsql::Connection,
        statement: &WriteStatement,
    ) -> Result<i64, libsql::Error> {
        match statement {
            WriteStatement::InsertMenu(menu) => {
                conn.execute(
                    r#"INSERT INTO menus (name, "order") VALUES (?, ?)"#,
                    (menu.name.as_str(), menu.order),
                )
                .await?
            }
            WriteStatement::InsertGroup(group) => {
                conn.execute(
                    r#"INSERT INTO sub_menus (parent_id, name, "order") VALUES (?, ?, ?)"#,
                    (group.menu_id, group.name.as_str(), group.order),
                )
                .await?
            }
            WriteStatement::InsertCard(card) => {
                conn.execute(
                    r#"INSERT INTO cards (menu_id, sub_menu_id, title, url, "order") VALUES (?, ?, ?, ?, ?)"#,
                    (
                        card.menu_id,
                        card.group_id,
                        card.title.as_str(),
                        card.url.as_str(),
                        card.order,
                    ),
                )
                .await?
            }
        };
        Ok(conn.last_insert_rowid())
    }

    /// Insert a single row and return its id
    pub async fn db_insert(&self, statement: &WriteStatement) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        Self::insert_on(&conn, statement)
            .await
            .map_err(DatabaseError::statement(StoreOperation::Insert, statement.table()))
    }

    /// Execute inserts atomically within a single transaction
    ///
    /// # Returns
    ///
    /// Generated row ids in submission order
    ///
    /// # Errors
    ///
    /// Any failed statement rolls back the whole batch.
    pub async fn db_execute_batch(
        &self,
        statements: &[WriteStatement],
    ) -> Result<Vec<i64>, DatabaseError> {
        if statements.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.connect_with_timeout().await?;

        conn.execute("BEGIN TRANSACTION", ())
            .await
            .map_err(|source| DatabaseError::BatchRolledBack {
                index: None,
                table: None,
                source,
            })?;

        let mut ids = Vec::with_capacity(statements.len());

        for (index, statement) in statements.iter().enumerate() {
            match Self::insert_on(&conn, statement).await {
                Ok(id) => ids.push(id),
                Err(source) => {
                    let _rollback = conn.execute("ROLLBACK", ()).await;
                    return Err(DatabaseError::BatchRolledBack {
                        index: Some(index),
                        table: Some(statement.table()),
                        source,
                    });
                }
            }
        }

        if let Err(source) = conn.execute("COMMIT", ()).await {
            let _rollback = conn.execute("ROLLBACK", ()).await;
            return Err(DatabaseError::BatchRolledBack {
                index: None,
                table: None,
                source,
            });
        }

        Ok(ids)
    }
}

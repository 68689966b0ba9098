//! NavStore Trait - Persistence Abstraction for Imports
//!
//! The import pipeline talks to storage only through this trait. The planner
//! needs three read-only listings to build its snapshot, the executor needs
//! inserts, scoped deletes (replace mode) and an atomic batch write.
//!
//! # Examples
//!
//! ```rust,no_run
//! use navhub_core::db::{DatabaseService, NavStore, TursoStore};
//! use navhub_core::models::CardScope;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/navhub.db")).await?);
//!     let store: Arc<dyn NavStore> = Arc::new(TursoStore::new(db));
//!
//!     let menus = store.list_menus().await?;
//!     let urls = store.list_card_urls(CardScope::All).await?;
//!     println!("{} menus, {} cards", menus.len(), urls.len());
//!     Ok(())
//! }
//! ```

use crate::models::{
    CardScope, CardUrlRecord, GroupRecord, MenuRecord, NewCard, NewGroup, NewMenu, WriteStatement,
};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction over the menu/group/card store
///
/// Implementations must be `Send + Sync` so a single store can be shared by
/// concurrent import requests behind an `Arc`.
#[async_trait]
pub trait NavStore: Send + Sync {
    //
    // READS
    //

    /// All menus, ordered by display order then id
    async fn list_menus(&self) -> Result<Vec<MenuRecord>>;

    /// A single menu by id
    async fn get_menu(&self, id: i64) -> Result<Option<MenuRecord>>;

    /// All groups across every menu
    async fn list_groups(&self) -> Result<Vec<GroupRecord>>;

    /// Groups under one menu
    async fn list_groups_for_menu(&self, menu_id: i64) -> Result<Vec<GroupRecord>>;

    /// `(menu, group, url)` triples for every card, or for one menu's cards
    async fn list_card_urls(&self, scope: CardScope) -> Result<Vec<CardUrlRecord>>;

    //
    // WRITES
    //

    async fn insert_menu(&self, menu: NewMenu) -> Result<i64>;

    async fn insert_group(&self, group: NewGroup) -> Result<i64>;

    async fn insert_card(&self, card: NewCard) -> Result<i64>;

    /// Delete every card under a menu, grouped or not; returns rows removed
    async fn delete_cards_for_menu(&self, menu_id: i64) -> Result<u64>;

    /// Delete every group under a menu; returns rows removed
    async fn delete_groups_for_menu(&self, menu_id: i64) -> Result<u64>;

    /// Execute inserts atomically and return generated ids in submission order
    async fn execute_batch(&self, statements: Vec<WriteStatement>) -> Result<Vec<i64>>;
}

//! TursoStore - NavStore Implementation for libsql
//!
//! Thin wrapper around [`DatabaseService`]: every method delegates to a
//! `db_*` SQL method and converts the returned `libsql::Row`s into model
//! records. No business logic lives here.

use crate::db::nav_store::NavStore;
use crate::db::DatabaseService;
use crate::models::{
    CardScope, CardUrlRecord, GroupRecord, MenuRecord, NewCard, NewGroup, NewMenu, WriteStatement,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use libsql::{Row, Rows};
use std::sync::Arc;

/// libsql-backed [`NavStore`]
pub struct TursoStore {
    db: Arc<DatabaseService>,
}

impl TursoStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Access the underlying database service
    pub fn database(&self) -> &Arc<DatabaseService> {
        &self.db
    }

    fn row_to_menu(row: &Row) -> Result<MenuRecord> {
        let id: i64 = row.get(0).context("Failed to get menu id")?;
        let name: String = row.get(1).context("Failed to get menu name")?;
        Ok(MenuRecord { id, name })
    }

    fn row_to_group(row: &Row) -> Result<GroupRecord> {
        let id: i64 = row.get(0).context("Failed to get sub_menu id")?;
        let menu_id: i64 = row.get(1).context("Failed to get sub_menu parent_id")?;
        let name: String = row.get(2).context("Failed to get sub_menu name")?;
        Ok(GroupRecord { id, menu_id, name })
    }

    fn row_to_card_url(row: &Row) -> Result<CardUrlRecord> {
        let menu_id: i64 = row.get(0).context("Failed to get card menu id")?;
        let group_id: Option<i64> = row.get(1).context("Failed to get card sub_menu_id")?;
        let url: String = row.get(2).context("Failed to get card url")?;
        Ok(CardUrlRecord {
            menu_id,
            group_id,
            url,
        })
    }

    /// Drain a row cursor through a converter
    async fn collect_rows<T>(mut rows: Rows, convert: fn(&Row) -> Result<T>) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(row) = rows.next().await.context("Failed to read row")? {
            records.push(convert(&row)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl NavStore for TursoStore {
    async fn list_menus(&self) -> Result<Vec<MenuRecord>> {
        let rows = self.db.db_list_menus().await?;
        Self::collect_rows(rows, Self::row_to_menu).await
    }

    async fn get_menu(&self, id: i64) -> Result<Option<MenuRecord>> {
        match self.db.db_get_menu(id).await? {
            Some(row) => Ok(Some(Self::row_to_menu(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_groups(&self) -> Result<Vec<GroupRecord>> {
        let rows = self.db.db_list_groups(None).await?;
        Self::collect_rows(rows, Self::row_to_group).await
    }

    async fn list_groups_for_menu(&self, menu_id: i64) -> Result<Vec<GroupRecord>> {
        let rows = self.db.db_list_groups(Some(menu_id)).await?;
        Self::collect_rows(rows, Self::row_to_group).await
    }

    async fn list_card_urls(&self, scope: CardScope) -> Result<Vec<CardUrlRecord>> {
        let menu_id = match scope {
            CardScope::All => None,
            CardScope::Menu(id) => Some(id),
        };
        let rows = self.db.db_list_card_urls(menu_id).await?;
        Self::collect_rows(rows, Self::row_to_card_url).await
    }

    async fn insert_menu(&self, menu: NewMenu) -> Result<i64> {
        let id = self.db.db_insert(&WriteStatement::InsertMenu(menu)).await?;
        Ok(id)
    }

    async fn insert_group(&self, group: NewGroup) -> Result<i64> {
        let id = self
            .db
            .db_insert(&WriteStatement::InsertGroup(group))
            .await?;
        Ok(id)
    }

    async fn insert_card(&self, card: NewCard) -> Result<i64> {
        let id = self.db.db_insert(&WriteStatement::InsertCard(card)).await?;
        Ok(id)
    }

    async fn delete_cards_for_menu(&self, menu_id: i64) -> Result<u64> {
        Ok(self.db.db_delete_cards_for_menu(menu_id).await?)
    }

    async fn delete_groups_for_menu(&self, menu_id: i64) -> Result<u64> {
        Ok(self.db.db_delete_groups_for_menu(menu_id).await?)
    }

    async fn execute_batch(&self, statements: Vec<WriteStatement>) -> Result<Vec<i64>> {
        let ids = self.db.db_execute_batch(&statements).await?;
        Ok(ids)
    }
}

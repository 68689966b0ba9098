//! Destination records
//!
//! Row shapes exchanged with the persistence layer: menus, groups (stored as
//! `sub_menus`) and cards. Only the columns the import pipeline reads or
//! writes are modelled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub menu_id: i64,
    pub name: String,
}

/// The `(menu, group, url)` triple of an existing card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUrlRecord {
    pub menu_id: i64,
    pub group_id: Option<i64>,
    pub url: String,
}

/// Which cards a URL listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardScope {
    All,
    Menu(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenu {
    pub name: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub menu_id: i64,
    pub name: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub menu_id: i64,
    pub group_id: Option<i64>,
    pub title: String,
    pub url: String,
    pub order: i64,
}

/// One insert in a batch submitted to [`crate::db::NavStore::execute_batch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatement {
    InsertMenu(NewMenu),
    InsertGroup(NewGroup),
    InsertCard(NewCard),
}

impl WriteStatement {
    /// Table the insert lands in
    pub fn table(&self) -> &'static str {
        match self {
            Self::InsertMenu(_) => "menus",
            Self::InsertGroup(_) => "sub_menus",
            Self::InsertCard(_) => "cards",
        }
    }
}

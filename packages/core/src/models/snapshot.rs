//! Destination Snapshot
//!
//! Read-only lookup structures over the destination state, loaded once before
//! planning and handed to the planner by reference:
//!
//! - menu name → menu id
//! - (menu id, group name) → group id
//! - (menu id, group id or none) → set of URLs
//!
//! The only mutation after loading is [`DestinationSnapshot::clear_urls_for_menu`],
//! which replace-mode callers apply before the snapshot reaches the planner.

use crate::models::{CardUrlRecord, GroupRecord, MenuRecord};
use std::collections::{HashMap, HashSet};

/// Key of one URL bucket: the card's menu and optional group
pub type UrlBucket = (i64, Option<i64>);

#[derive(Debug, Clone, Default)]
pub struct DestinationSnapshot {
    menus: HashMap<String, i64>,
    menu_names: HashMap<i64, String>,
    groups: HashMap<i64, HashMap<String, i64>>,
    urls: HashMap<UrlBucket, HashSet<String>>,
}

impl DestinationSnapshot {
    /// Build lookup tables from raw destination rows
    ///
    /// When two menus share a name the first listed wins, matching how the
    /// rows come back ordered by id.
    pub fn from_records(
        menus: Vec<MenuRecord>,
        groups: Vec<GroupRecord>,
        cards: Vec<CardUrlRecord>,
    ) -> Self {
        let mut snapshot = Self::default();

        for menu in menus {
            snapshot.menu_names.insert(menu.id, menu.name.clone());
            snapshot.menus.entry(menu.name).or_insert(menu.id);
        }

        for group in groups {
            snapshot
                .groups
                .entry(group.menu_id)
                .or_default()
                .entry(group.name)
                .or_insert(group.id);
        }

        for card in cards {
            snapshot
                .urls
                .entry((card.menu_id, card.group_id))
                .or_default()
                .insert(card.url);
        }

        snapshot
    }

    /// Menu id by exact (case-sensitive) name
    pub fn menu_id(&self, name: &str) -> Option<i64> {
        self.menus.get(name).copied()
    }

    /// Menu name by id
    pub fn menu_name(&self, id: i64) -> Option<&str> {
        self.menu_names.get(&id).map(String::as_str)
    }

    /// Group id by exact name, scoped to a parent menu
    pub fn group_id(&self, menu_id: i64, name: &str) -> Option<i64> {
        self.groups.get(&menu_id).and_then(|g| g.get(name)).copied()
    }

    /// Whether `url` already exists in the given bucket
    pub fn contains_url(&self, bucket: UrlBucket, url: &str) -> bool {
        self.urls.get(&bucket).is_some_and(|set| set.contains(url))
    }

    /// Drop every URL bucket under `menu_id` (menu-level and all its groups)
    pub fn clear_urls_for_menu(&mut self, menu_id: i64) {
        self.urls.retain(|(menu, _), _| *menu != menu_id);
    }

    pub fn menu_count(&self) -> usize {
        self.menu_names.len()
    }

    pub fn url_count(&self) -> usize {
        self.urls.values().map(HashSet::len).sum()
    }
}

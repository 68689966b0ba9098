//! Import Plan Model
//!
//! An `ImportPlan` is the value object produced by the planner and consumed,
//! unchanged, by the executor. Menus and groups form an arena of
//! not-yet-persisted entities addressed by stable synthetic keys; cards refer
//! to them by key so the plan can be built (and previewed) before any real
//! identifier exists.
//!
//! # Key scheme
//!
//! - Menu key: `"menu:" + name`
//! - Group key: `menu_key + "||group:" + name`, so identical group names under
//!   different menus never collide

use serde::{Deserialize, Serialize};

/// Build the synthetic key for a menu
pub fn menu_key(name: &str) -> String {
    format!("menu:{}", name)
}

/// Build the synthetic key for a group scoped to `menu_key`
pub fn group_key(menu_key: &str, name: &str) -> String {
    format!("{}||group:{}", menu_key, name)
}

/// Whether a menu or group is created or an existing one is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityAction {
    Create,
    Reuse,
}

/// Whether a card is created or skipped as a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardAction {
    Create,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPlan {
    pub key: String,
    pub name: String,
    pub action: EntityAction,
    /// Identifier of the reused menu; `None` when `action` is `Create`
    pub existing_id: Option<i64>,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPlan {
    pub key: String,
    pub menu_key: String,
    pub name: String,
    pub action: EntityAction,
    pub existing_id: Option<i64>,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPlan {
    pub menu_key: String,
    /// `None` when the card attaches directly to the menu
    pub group_key: Option<String>,
    pub title: String,
    pub url: String,
    pub action: CardAction,
    pub order: usize,
}

/// Created/reused/skipped counts per entity kind
///
/// Always derived from the plan lists via [`PlanStats::tally`]; never
/// maintained incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStats {
    pub menus_to_create: usize,
    pub menus_to_reuse: usize,
    pub groups_to_create: usize,
    pub groups_to_reuse: usize,
    pub cards_to_create: usize,
    pub cards_to_skip: usize,
}

impl PlanStats {
    /// Count plan entries by action
    pub fn tally(menus: &[MenuPlan], groups: &[GroupPlan], cards: &[CardPlan]) -> Self {
        let mut stats = Self::default();
        for menu in menus {
            match menu.action {
                EntityAction::Create => stats.menus_to_create += 1,
                EntityAction::Reuse => stats.menus_to_reuse += 1,
            }
        }
        for group in groups {
            match group.action {
                EntityAction::Create => stats.groups_to_create += 1,
                EntityAction::Reuse => stats.groups_to_reuse += 1,
            }
        }
        for card in cards {
            match card.action {
                CardAction::Create => stats.cards_to_create += 1,
                CardAction::Skip => stats.cards_to_skip += 1,
            }
        }
        stats
    }
}

/// The computed, not-yet-applied set of create/reuse/skip decisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPlan {
    pub menus: Vec<MenuPlan>,
    pub groups: Vec<GroupPlan>,
    pub cards: Vec<CardPlan>,
    pub stats: PlanStats,
}

impl ImportPlan {
    /// Look up a menu entry by key
    pub fn menu(&self, key: &str) -> Option<&MenuPlan> {
        self.menus.iter().find(|m| m.key == key)
    }

    /// Look up a group entry by key
    pub fn group(&self, key: &str) -> Option<&GroupPlan> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Identifiers of menus the plan reuses, in plan order
    pub fn reused_menu_ids(&self) -> Vec<i64> {
        self.menus
            .iter()
            .filter(|m| m.action == EntityAction::Reuse)
            .filter_map(|m| m.existing_id)
            .collect()
    }

    /// Whether `stats` matches the list contents
    pub fn stats_consistent(&self) -> bool {
        self.stats == PlanStats::tally(&self.menus, &self.groups, &self.cards)
    }

    /// Whether every group and card references a menu present in `menus`
    pub fn references_resolve(&self) -> bool {
        let groups_ok = self.groups.iter().all(|g| self.menu(&g.menu_key).is_some());
        let cards_ok = self.cards.iter().all(|c| {
            self.menu(&c.menu_key).is_some()
                && c.group_key.as_deref().map_or(true, |k| self.group(k).is_some())
        });
        groups_ok && cards_ok
    }
}

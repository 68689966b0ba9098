//! Import Planner
//!
//! Reconciles parsed bookmarks against a [`DestinationSnapshot`] and produces
//! an [`ImportPlan`]: which menus and groups to create or reuse, and which
//! cards to create or skip as duplicates.
//!
//! # Target modes
//!
//! - **Auto**: each distinct root folder becomes a menu, the remaining folder
//!   path (joined with the separator) becomes a group under it. Loose
//!   bookmarks go to the fallback menu with no group.
//! - **Menu**: everything is merged into one existing menu. The *full* path,
//!   root folder included, becomes the group name.
//!
//! # Reconciliation
//!
//! - Menus are reused by exact name, groups by exact name under the resolved
//!   parent's existing id. A menu still to be created has no existing groups.
//! - A card is skipped when its URL is already in the snapshot bucket for
//!   `(menu id, group id)`, or when an earlier card in the same plan already
//!   targets the same `(menu key, group key, url)`. Buckets of entities still
//!   to be created are empty.
//! - `order` is assigned densely per scope from 0, in first-encountered order.
//!
//! The planner performs no I/O and cannot fail; requests must be validated
//! by the caller (e.g. the target menu must exist).

use crate::models::{
    group_key, menu_key, BookmarkRecord, CardAction, CardPlan, DestinationSnapshot, EntityAction,
    GroupPlan, ImportPlan, MenuPlan, PlanStats,
};
use std::collections::{HashMap, HashSet};

/// Default menu for bookmarks with no root folder in auto mode
pub const DEFAULT_FALLBACK_MENU: &str = "Home";

/// Default separator joining folder path segments into a group name
pub const DEFAULT_GROUP_SEPARATOR: &str = " / ";

/// Where the bookmarks should land
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanTarget {
    Auto,
    /// An existing menu, already validated by the caller
    Menu { id: i64, name: String },
}

/// Naming knobs for the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerOptions {
    pub fallback_menu_name: String,
    pub group_separator: String,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            fallback_menu_name: DEFAULT_FALLBACK_MENU.to_string(),
            group_separator: DEFAULT_GROUP_SEPARATOR.to_string(),
        }
    }
}

/// Inputs to [`generate_import_plan`]
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub bookmarks: &'a [BookmarkRecord],
    /// Root folder names from the parse, in document order. Menus come from
    /// each bookmark's own root folder; this list only feeds the diagnostic
    /// for root folders that end up empty.
    pub root_folders: &'a [String],
    pub target: &'a PlanTarget,
    pub snapshot: &'a DestinationSnapshot,
    pub options: &'a PlannerOptions,
}

/// Arena of planned entities addressed by synthetic key
struct PlanBuilder<'a> {
    snapshot: &'a DestinationSnapshot,
    menus: Vec<MenuPlan>,
    groups: Vec<GroupPlan>,
    cards: Vec<CardPlan>,
    menu_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    /// Next group order per menu key
    group_orders: HashMap<String, usize>,
    /// Next card order per scope (group key, or menu key for menu-level cards)
    card_orders: HashMap<String, usize>,
    /// URLs already planned per (menu key, group key)
    planned_urls: HashMap<(String, Option<String>), HashSet<String>>,
}

impl<'a> PlanBuilder<'a> {
    fn new(snapshot: &'a DestinationSnapshot) -> Self {
        Self {
            snapshot,
            menus: Vec::new(),
            groups: Vec::new(),
            cards: Vec::new(),
            menu_index: HashMap::new(),
            group_index: HashMap::new(),
            group_orders: HashMap::new(),
            card_orders: HashMap::new(),
            planned_urls: HashMap::new(),
        }
    }

    fn push_menu(&mut self, name: &str, existing_id: Option<i64>) -> String {
        let key = menu_key(name);
        let action = if existing_id.is_some() {
            EntityAction::Reuse
        } else {
            EntityAction::Create
        };

        tracing::debug!(menu = %name, ?action, "Planned menu");

        self.menu_index.insert(key.clone(), self.menus.len());
        self.menus.push(MenuPlan {
            key: key.clone(),
            name: name.to_string(),
            action,
            existing_id,
            order: self.menus.len(),
        });
        key
    }

    /// Menu entry by name, reusing an existing destination menu when present
    fn ensure_menu(&mut self, name: &str) -> String {
        let key = menu_key(name);
        if self.menu_index.contains_key(&key) {
            return key;
        }
        let existing_id = self.snapshot.menu_id(name);
        self.push_menu(name, existing_id)
    }

    fn ensure_group(&mut self, menu_key: &str, name: &str) -> String {
        let key = group_key(menu_key, name);
        if self.group_index.contains_key(&key) {
            return key;
        }

        let existing_id = self
            .menu_existing_id(menu_key)
            .and_then(|menu_id| self.snapshot.group_id(menu_id, name));
        let action = if existing_id.is_some() {
            EntityAction::Reuse
        } else {
            EntityAction::Create
        };

        let next = self.group_orders.entry(menu_key.to_string()).or_insert(0);
        let order = *next;
        *next += 1;

        tracing::debug!(menu_key = %menu_key, group = %name, ?action, "Planned group");

        self.group_index.insert(key.clone(), self.groups.len());
        self.groups.push(GroupPlan {
            key: key.clone(),
            menu_key: menu_key.to_string(),
            name: name.to_string(),
            action,
            existing_id,
            order,
        });
        key
    }

    fn menu_existing_id(&self, menu_key: &str) -> Option<i64> {
        self.menu_index
            .get(menu_key)
            .and_then(|&i| self.menus[i].existing_id)
    }

    fn group_existing_id(&self, group_key: &str) -> Option<i64> {
        self.group_index
            .get(group_key)
            .and_then(|&i| self.groups[i].existing_id)
    }

    /// Whether the destination already holds `url` in the card's bucket
    fn exists_in_destination(&self, menu_key: &str, group_key: Option<&str>, url: &str) -> bool {
        let Some(menu_id) = self.menu_existing_id(menu_key) else {
            return false;
        };
        let group_id = match group_key {
            Some(key) => match self.group_existing_id(key) {
                Some(id) => Some(id),
                None => return false,
            },
            None => None,
        };
        self.snapshot.contains_url((menu_id, group_id), url)
    }

    fn add_card(&mut self, menu_key: &str, group_key: Option<&str>, bookmark: &BookmarkRecord) {
        let bucket = (menu_key.to_string(), group_key.map(str::to_string));
        let duplicate_in_batch = self
            .planned_urls
            .get(&bucket)
            .is_some_and(|urls| urls.contains(&bookmark.url));

        let action = if duplicate_in_batch
            || self.exists_in_destination(menu_key, group_key, &bookmark.url)
        {
            CardAction::Skip
        } else {
            CardAction::Create
        };

        let scope = group_key.unwrap_or(menu_key).to_string();
        let next = self.card_orders.entry(scope).or_insert(0);
        let order = *next;
        *next += 1;

        self.cards.push(CardPlan {
            menu_key: menu_key.to_string(),
            group_key: group_key.map(str::to_string),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            action,
            order,
        });

        self.planned_urls
            .entry(bucket)
            .or_default()
            .insert(bookmark.url.clone());
    }

    fn finish(self) -> ImportPlan {
        let stats = PlanStats::tally(&self.menus, &self.groups, &self.cards);
        ImportPlan {
            menus: self.menus,
            groups: self.groups,
            cards: self.cards,
            stats,
        }
    }
}

/// Compute the import plan for parsed bookmarks against a destination snapshot
///
/// # Examples
///
/// ```rust
/// use navhub_core::import::{generate_import_plan, PlanRequest, PlanTarget, PlannerOptions};
/// use navhub_core::models::{BookmarkRecord, DestinationSnapshot, EntityAction};
///
/// let bookmarks = vec![BookmarkRecord {
///     title: "X".to_string(),
///     url: "https://x.test".to_string(),
///     root_folder: Some("A".to_string()),
///     folder_path: vec!["B".to_string()],
///     order: 0,
/// }];
/// let plan = generate_import_plan(PlanRequest {
///     bookmarks: &bookmarks,
///     root_folders: &["A".to_string()],
///     target: &PlanTarget::Auto,
///     snapshot: &DestinationSnapshot::default(),
///     options: &PlannerOptions::default(),
/// });
/// assert_eq!(plan.menus[0].name, "A");
/// assert_eq!(plan.groups[0].name, "B");
/// assert_eq!(plan.menus[0].action, EntityAction::Create);
/// ```
pub fn generate_import_plan(request: PlanRequest<'_>) -> ImportPlan {
    let mut builder = PlanBuilder::new(request.snapshot);
    let separator = request.options.group_separator.as_str();

    match request.target {
        PlanTarget::Auto => {
            for bookmark in request.bookmarks {
                let Some(root) = bookmark.root_folder.as_deref() else {
                    let menu = builder.ensure_menu(&request.options.fallback_menu_name);
                    builder.add_card(&menu, None, bookmark);
                    continue;
                };

                let menu = builder.ensure_menu(root);
                if bookmark.folder_path.is_empty() {
                    builder.add_card(&menu, None, bookmark);
                } else {
                    let group = builder.ensure_group(&menu, &bookmark.folder_path.join(separator));
                    builder.add_card(&menu, Some(&group), bookmark);
                }
            }

            let empty_roots: Vec<&str> = request
                .root_folders
                .iter()
                .filter(|root| !builder.menu_index.contains_key(&menu_key(root)))
                .map(String::as_str)
                .collect();
            if !empty_roots.is_empty() {
                tracing::debug!(?empty_roots, "Root folders without bookmarks get no menu");
            }
        }
        PlanTarget::Menu { id, name } => {
            let menu = builder.push_menu(name, Some(*id));

            for bookmark in request.bookmarks {
                let path = bookmark.full_path();
                if path.is_empty() {
                    builder.add_card(&menu, None, bookmark);
                } else {
                    let group = builder.ensure_group(&menu, &path.join(separator));
                    builder.add_card(&menu, Some(&group), bookmark);
                }
            }
        }
    }

    let plan = builder.finish();
    tracing::debug!(stats = ?plan.stats, "Generated import plan");
    plan
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod planner_test;

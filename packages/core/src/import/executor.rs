//! Plan Executor
//!
//! Applies an [`ImportPlan`] to a [`NavStore`] without reinterpreting it: the
//! only job here is to replace synthetic menu/group keys with real ids and
//! write what the plan says to create.
//!
//! Writes happen strictly in dependency order (menus, then groups, then
//! cards). Each batch is atomic, the import as a whole is not: a failure
//! part-way leaves earlier batches committed. Re-running the same import
//! converges because menus and groups are resolved by name against live
//! state before anything is inserted.

use crate::db::NavStore;
use crate::models::{
    CardAction, EntityAction, GroupPlan, ImportPlan, NewCard, NewGroup, NewMenu, WriteStatement,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Largest number of statements submitted in one batch
pub const MAX_BATCH_SIZE: usize = 100;

/// What an apply actually did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub menus_created: usize,
    pub menus_reused: usize,
    pub groups_created: usize,
    pub groups_reused: usize,
    pub cards_created: usize,
    pub cards_skipped: usize,
    /// Rows deleted by replace mode before writing
    pub cards_removed: u64,
    pub groups_removed: u64,
    /// Per-entry resolution failures; these entries were not written
    pub errors: Vec<String>,
}

/// Writes plans to a store in bounded batches
pub struct PlanExecutor {
    store: Arc<dyn NavStore>,
    batch_size: usize,
}

impl PlanExecutor {
    pub fn new(store: Arc<dyn NavStore>) -> Self {
        Self {
            store,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Override the batch size, clamped to `1..=MAX_BATCH_SIZE`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Apply `plan`, first clearing groups and cards under `replace_menu_ids`
    ///
    /// Persistence failures abort the apply and propagate. Cards or groups
    /// whose keys cannot be resolved are reported in
    /// [`ExecutionReport::errors`] and skipped without aborting siblings.
    pub async fn execute(
        &self,
        plan: &ImportPlan,
        replace_menu_ids: &[i64],
    ) -> Result<ExecutionReport> {
        let mut report = ExecutionReport::default();

        for &menu_id in replace_menu_ids {
            report.cards_removed += self
                .store
                .delete_cards_for_menu(menu_id)
                .await
                .with_context(|| format!("Failed to clear cards of menu {}", menu_id))?;
            report.groups_removed += self
                .store
                .delete_groups_for_menu(menu_id)
                .await
                .with_context(|| format!("Failed to clear groups of menu {}", menu_id))?;
        }
        if !replace_menu_ids.is_empty() {
            tracing::info!(
                menus = replace_menu_ids.len(),
                cards_removed = report.cards_removed,
                groups_removed = report.groups_removed,
                "Cleared menus for replace"
            );
        }

        let menu_ids = self.resolve_menus(plan, &mut report).await?;
        let group_ids = self.resolve_groups(plan, &menu_ids, &mut report).await?;
        self.write_cards(plan, &menu_ids, &group_ids, &mut report)
            .await?;

        tracing::info!(
            menus_created = report.menus_created,
            groups_created = report.groups_created,
            cards_created = report.cards_created,
            cards_skipped = report.cards_skipped,
            errors = report.errors.len(),
            "Applied import plan"
        );

        Ok(report)
    }

    /// Map every menu key to a real id, inserting menus that do not exist
    async fn resolve_menus(
        &self,
        plan: &ImportPlan,
        report: &mut ExecutionReport,
    ) -> Result<HashMap<String, i64>> {
        let live = self.store.list_menus().await?;
        let mut by_name: HashMap<&str, i64> = HashMap::new();
        for menu in &live {
            by_name.entry(menu.name.as_str()).or_insert(menu.id);
        }

        let mut ids = HashMap::new();
        let mut pending = Vec::new();

        for menu in &plan.menus {
            let existing = match (menu.action, menu.existing_id) {
                (EntityAction::Reuse, Some(id)) => Some(id),
                _ => by_name.get(menu.name.as_str()).copied(),
            };
            match existing {
                Some(id) => {
                    report.menus_reused += 1;
                    ids.insert(menu.key.clone(), id);
                }
                None => pending.push(menu),
            }
        }

        let base_order = live.len() as i64;
        let statements: Vec<WriteStatement> = pending
            .iter()
            .enumerate()
            .map(|(i, menu)| {
                WriteStatement::InsertMenu(NewMenu {
                    name: menu.name.clone(),
                    order: base_order + i as i64,
                })
            })
            .collect();

        let created = self
            .submit(statements)
            .await
            .context("Failed to create menus")?;
        for (menu, id) in pending.iter().zip(created) {
            tracing::debug!(menu = %menu.name, id, "Created menu");
            ids.insert(menu.key.clone(), id);
            report.menus_created += 1;
        }

        Ok(ids)
    }

    /// Map every group key to a real id, fetching each parent's groups once
    async fn resolve_groups(
        &self,
        plan: &ImportPlan,
        menu_ids: &HashMap<String, i64>,
        report: &mut ExecutionReport,
    ) -> Result<HashMap<String, i64>> {
        let mut by_parent: Vec<(&str, Vec<&GroupPlan>)> = Vec::new();
        for group in &plan.groups {
            match by_parent.iter_mut().find(|(key, _)| *key == group.menu_key) {
                Some((_, groups)) => groups.push(group),
                None => by_parent.push((group.menu_key.as_str(), vec![group])),
            }
        }

        let mut ids = HashMap::new();

        for (menu_key, groups) in by_parent {
            let Some(&menu_id) = menu_ids.get(menu_key) else {
                for group in groups {
                    let message = format!(
                        "Group \"{}\": parent menu {} did not resolve",
                        group.name, menu_key
                    );
                    tracing::warn!("{}", message);
                    report.errors.push(message);
                }
                continue;
            };

            let live = self.store.list_groups_for_menu(menu_id).await?;
            let mut by_name: HashMap<&str, i64> = HashMap::new();
            for group in &live {
                by_name.entry(group.name.as_str()).or_insert(group.id);
            }

            let mut pending = Vec::new();
            for group in groups {
                match by_name.get(group.name.as_str()) {
                    Some(&id) => {
                        report.groups_reused += 1;
                        ids.insert(group.key.clone(), id);
                    }
                    None => pending.push(group),
                }
            }

            let base_order = live.len() as i64;
            let statements: Vec<WriteStatement> = pending
                .iter()
                .enumerate()
                .map(|(i, group)| {
                    WriteStatement::InsertGroup(NewGroup {
                        menu_id,
                        name: group.name.clone(),
                        order: base_order + i as i64,
                    })
                })
                .collect();

            let created = self
                .submit(statements)
                .await
                .with_context(|| format!("Failed to create groups under menu {}", menu_id))?;
            for (group, id) in pending.iter().zip(created) {
                tracing::debug!(group = %group.name, menu_id, id, "Created group");
                ids.insert(group.key.clone(), id);
                report.groups_created += 1;
            }
        }

        Ok(ids)
    }

    async fn write_cards(
        &self,
        plan: &ImportPlan,
        menu_ids: &HashMap<String, i64>,
        group_ids: &HashMap<String, i64>,
        report: &mut ExecutionReport,
    ) -> Result<()> {
        let mut statements = Vec::new();

        for card in &plan.cards {
            if card.action == CardAction::Skip {
                report.cards_skipped += 1;
                continue;
            }

            let Some(&menu_id) = menu_ids.get(&card.menu_key) else {
                let message = format!(
                    "Card \"{}\": menu {} did not resolve",
                    card.title, card.menu_key
                );
                tracing::warn!("{}", message);
                report.errors.push(message);
                continue;
            };

            let group_id = match card.group_key.as_deref() {
                Some(key) => match group_ids.get(key) {
                    Some(&id) => Some(id),
                    None => {
                        let message =
                            format!("Card \"{}\": group {} did not resolve", card.title, key);
                        tracing::warn!("{}", message);
                        report.errors.push(message);
                        continue;
                    }
                },
                None => None,
            };

            statements.push(WriteStatement::InsertCard(NewCard {
                menu_id,
                group_id,
                title: card.title.clone(),
                url: card.url.clone(),
                order: card.order as i64,
            }));
        }

        let created = self
            .submit(statements)
            .await
            .context("Failed to create cards")?;
        report.cards_created += created.len();

        Ok(())
    }

    /// Submit statements in chunks of `batch_size`, returning ids in order
    async fn submit(&self, statements: Vec<WriteStatement>) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(statements.len());
        let mut remaining = statements.into_iter().peekable();

        while remaining.peek().is_some() {
            let batch: Vec<WriteStatement> = remaining.by_ref().take(self.batch_size).collect();
            tracing::debug!(statements = batch.len(), "Submitting batch");
            ids.extend(self.store.execute_batch(batch).await?);
        }

        Ok(ids)
    }
}

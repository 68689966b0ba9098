//! Preview summary
//!
//! Human-oriented digest of an [`ImportPlan`]: per-menu and per-group card
//! counts, a bounded sample of where bookmarks will land, and the parse
//! errors collected on the way.

use crate::models::{CardAction, EntityAction, ImportPlan, PlanStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub name: String,
    pub action: EntityAction,
    pub cards_to_create: usize,
    pub cards_to_skip: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSummary {
    pub name: String,
    pub action: EntityAction,
    /// Cards attached directly to the menu
    pub cards_to_create: usize,
    pub cards_to_skip: usize,
    pub groups: Vec<GroupSummary>,
}

/// One bookmark as it will appear after import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleBookmark {
    pub title: String,
    pub url: String,
    pub menu: String,
    pub group: Option<String>,
    pub action: CardAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_bookmarks: usize,
    pub stats: PlanStats,
    pub menus: Vec<MenuSummary>,
    pub sample: Vec<SampleBookmark>,
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// Summarize a plan, keeping at most `sample_limit` sample bookmarks
    pub fn build(plan: &ImportPlan, parse_errors: &[String], sample_limit: usize) -> Self {
        let mut menus: Vec<MenuSummary> = plan
            .menus
            .iter()
            .map(|menu| MenuSummary {
                name: menu.name.clone(),
                action: menu.action,
                cards_to_create: 0,
                cards_to_skip: 0,
                groups: Vec::new(),
            })
            .collect();
        let menu_slots: HashMap<&str, usize> = plan
            .menus
            .iter()
            .enumerate()
            .map(|(i, m)| (m.key.as_str(), i))
            .collect();

        let mut group_slots: HashMap<&str, (usize, usize)> = HashMap::new();
        for group in &plan.groups {
            let Some(&menu_slot) = menu_slots.get(group.menu_key.as_str()) else {
                continue;
            };
            let groups = &mut menus[menu_slot].groups;
            group_slots.insert(group.key.as_str(), (menu_slot, groups.len()));
            groups.push(GroupSummary {
                name: group.name.clone(),
                action: group.action,
                cards_to_create: 0,
                cards_to_skip: 0,
            });
        }

        let mut sample = Vec::new();

        for card in &plan.cards {
            let counters = match card.group_key.as_deref() {
                Some(key) => match group_slots.get(key) {
                    Some(&(m, g)) => {
                        let group = &mut menus[m].groups[g];
                        Some((&mut group.cards_to_create, &mut group.cards_to_skip))
                    }
                    None => None,
                },
                None => match menu_slots.get(card.menu_key.as_str()) {
                    Some(&m) => {
                        let menu = &mut menus[m];
                        Some((&mut menu.cards_to_create, &mut menu.cards_to_skip))
                    }
                    None => None,
                },
            };
            if let Some((to_create, to_skip)) = counters {
                match card.action {
                    CardAction::Create => *to_create += 1,
                    CardAction::Skip => *to_skip += 1,
                }
            }

            if sample.len() < sample_limit {
                sample.push(SampleBookmark {
                    title: card.title.clone(),
                    url: card.url.clone(),
                    menu: plan
                        .menu(&card.menu_key)
                        .map(|m| m.name.clone())
                        .unwrap_or_default(),
                    group: card
                        .group_key
                        .as_deref()
                        .and_then(|k| plan.group(k))
                        .map(|g| g.name.clone()),
                    action: card.action,
                });
            }
        }

        Self {
            total_bookmarks: plan.cards.len(),
            stats: plan.stats,
            menus,
            sample,
            errors: parse_errors.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{group_key, menu_key, CardPlan, GroupPlan, MenuPlan};

    fn plan() -> ImportPlan {
        let work = menu_key("Work");
        let docs = group_key(&work, "Docs");
        let card = |group: Option<&str>, url: &str, action| CardPlan {
            menu_key: work.clone(),
            group_key: group.map(str::to_string),
            title: url.to_string(),
            url: url.to_string(),
            action,
            order: 0,
        };
        let mut plan = ImportPlan {
            menus: vec![MenuPlan {
                key: work.clone(),
                name: "Work".to_string(),
                action: EntityAction::Reuse,
                existing_id: Some(1),
                order: 0,
            }],
            groups: vec![GroupPlan {
                key: docs.clone(),
                menu_key: work.clone(),
                name: "Docs".to_string(),
                action: EntityAction::Create,
                existing_id: None,
                order: 0,
            }],
            cards: vec![
                card(Some(&docs), "https://a.test", CardAction::Create),
                card(Some(&docs), "https://a.test", CardAction::Skip),
                card(None, "https://b.test", CardAction::Create),
            ],
            stats: PlanStats::default(),
        };
        plan.stats = PlanStats::tally(&plan.menus, &plan.groups, &plan.cards);
        plan
    }

    #[test]
    fn test_counts_per_menu_and_group() {
        let summary = ImportSummary::build(&plan(), &[], 20);
        assert_eq!(summary.total_bookmarks, 3);
        assert_eq!(summary.menus.len(), 1);

        let work = &summary.menus[0];
        assert_eq!((work.cards_to_create, work.cards_to_skip), (1, 0));
        assert_eq!(work.groups[0].name, "Docs");
        assert_eq!(
            (work.groups[0].cards_to_create, work.groups[0].cards_to_skip),
            (1, 1)
        );
        assert_eq!(summary.sample[0].group.as_deref(), Some("Docs"));
        assert_eq!(summary.sample[2].group, None);
    }

    #[test]
    fn test_sample_is_bounded_and_errors_carried() {
        let errors = vec!["Skipped a folder with an empty name".to_string()];
        let summary = ImportSummary::build(&plan(), &errors, 2);
        assert_eq!(summary.sample.len(), 2);
        assert_eq!(summary.errors, errors);
    }
}

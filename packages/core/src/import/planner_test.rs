//! Tests for the import planner
//!
//! Covers both target modes, reuse/skip reconciliation against a snapshot,
//! batch-internal de-duplication and per-scope ordering.

#[cfg(test)]
mod tests {
    use crate::import::planner::{generate_import_plan, PlanRequest, PlanTarget, PlannerOptions};
    use crate::models::{
        BookmarkRecord, CardAction, CardUrlRecord, DestinationSnapshot, EntityAction,
        GroupRecord, ImportPlan, MenuRecord,
    };

    fn bookmark(title: &str, url: &str, root: Option<&str>, path: &[&str]) -> BookmarkRecord {
        BookmarkRecord {
            title: title.to_string(),
            url: url.to_string(),
            root_folder: root.map(str::to_string),
            folder_path: path.iter().map(|s| s.to_string()).collect(),
            order: 0,
        }
    }

    fn plan_with(
        bookmarks: &[BookmarkRecord],
        target: PlanTarget,
        snapshot: &DestinationSnapshot,
    ) -> ImportPlan {
        let root_folders: Vec<String> = bookmarks
            .iter()
            .filter_map(|b| b.root_folder.clone())
            .collect();
        let plan = generate_import_plan(PlanRequest {
            bookmarks,
            root_folders: &root_folders,
            target: &target,
            snapshot,
            options: &PlannerOptions::default(),
        });
        assert!(plan.stats_consistent(), "stats drifted: {:?}", plan.stats);
        assert!(plan.references_resolve(), "dangling key in {:?}", plan);
        plan
    }

    fn work_snapshot() -> DestinationSnapshot {
        DestinationSnapshot::from_records(
            vec![
                MenuRecord { id: 7, name: "Work".to_string() },
                MenuRecord { id: 8, name: "Home".to_string() },
            ],
            vec![GroupRecord { id: 70, menu_id: 7, name: "Docs".to_string() }],
            vec![
                CardUrlRecord { menu_id: 7, group_id: Some(70), url: "https://docs.test".to_string() },
                CardUrlRecord { menu_id: 7, group_id: None, url: "https://work.test".to_string() },
                CardUrlRecord { menu_id: 8, group_id: None, url: "https://home.test".to_string() },
            ],
        )
    }

    #[test]
    fn test_auto_mode_nested_folder_round_trip() {
        let bookmarks = vec![bookmark("X", "https://x.test", Some("A"), &["B"])];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &DestinationSnapshot::default());

        assert_eq!(plan.menus.len(), 1);
        assert_eq!(plan.menus[0].name, "A");
        assert_eq!(plan.menus[0].key, "menu:A");
        assert_eq!(plan.menus[0].action, EntityAction::Create);
        assert_eq!(plan.menus[0].existing_id, None);

        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].name, "B");
        assert_eq!(plan.groups[0].menu_key, "menu:A");
        assert_eq!(plan.groups[0].action, EntityAction::Create);

        let card = &plan.cards[0];
        assert_eq!(card.title, "X");
        assert_eq!(card.url, "https://x.test");
        assert_eq!(card.action, CardAction::Create);
        assert_eq!(card.group_key.as_deref(), Some(plan.groups[0].key.as_str()));
    }

    #[test]
    fn test_explicit_menu_mode_includes_root_in_group_name() {
        let bookmarks = vec![bookmark("X", "https://x.test", Some("A"), &["B"])];
        let snapshot = work_snapshot();
        let plan = plan_with(
            &bookmarks,
            PlanTarget::Menu { id: 7, name: "Work".to_string() },
            &snapshot,
        );

        assert_eq!(plan.menus.len(), 1);
        assert_eq!(plan.menus[0].name, "Work");
        assert_eq!(plan.menus[0].action, EntityAction::Reuse);
        assert_eq!(plan.menus[0].existing_id, Some(7));
        assert_eq!(plan.groups[0].name, "A / B");
        assert_eq!(plan.groups[0].action, EntityAction::Create);
        assert_eq!(plan.stats.menus_to_reuse, 1);
        assert_eq!(plan.stats.groups_to_create, 1);
    }

    #[test]
    fn test_explicit_menu_mode_loose_bookmark_has_no_group() {
        let bookmarks = vec![
            bookmark("Loose", "https://loose.test", None, &[]),
            bookmark("Rooted", "https://rooted.test", Some("Docs"), &[]),
        ];
        let snapshot = work_snapshot();
        let plan = plan_with(
            &bookmarks,
            PlanTarget::Menu { id: 7, name: "Work".to_string() },
            &snapshot,
        );

        assert_eq!(plan.cards[0].group_key, None);
        // Root folder alone becomes the group and matches the existing one
        assert_eq!(plan.groups[0].name, "Docs");
        assert_eq!(plan.groups[0].action, EntityAction::Reuse);
        assert_eq!(plan.groups[0].existing_id, Some(70));
    }

    #[test]
    fn test_loose_bookmarks_go_to_fallback_menu_without_group() {
        let bookmarks = vec![
            bookmark("One", "https://one.test", None, &[]),
            bookmark("Two", "https://two.test", None, &[]),
        ];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &DestinationSnapshot::default());

        assert_eq!(plan.menus.len(), 1);
        assert_eq!(plan.menus[0].name, "Home");
        assert!(plan.groups.is_empty());
        assert!(plan
            .cards
            .iter()
            .all(|c| c.menu_key == "menu:Home" && c.group_key.is_none()));
    }

    #[test]
    fn test_fallback_menu_reused_when_present() {
        let bookmarks = vec![
            bookmark("Home page", "https://home.test", None, &[]),
            bookmark("Other", "https://other.test", None, &[]),
        ];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &work_snapshot());

        assert_eq!(plan.menus[0].action, EntityAction::Reuse);
        assert_eq!(plan.menus[0].existing_id, Some(8));
        assert_eq!(plan.cards[0].action, CardAction::Skip);
        assert_eq!(plan.cards[1].action, CardAction::Create);
    }

    #[test]
    fn test_rooted_bookmark_without_path_attaches_to_menu() {
        let bookmarks = vec![bookmark("Top", "https://top.test", Some("A"), &[])];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &DestinationSnapshot::default());
        assert!(plan.groups.is_empty());
        assert_eq!(plan.cards[0].menu_key, "menu:A");
        assert_eq!(plan.cards[0].group_key, None);
    }

    #[test]
    fn test_duplicate_urls_in_same_bucket_only_first_created() {
        let bookmarks = vec![
            bookmark("First", "https://dup.test", Some("A"), &["B"]),
            bookmark("Second", "https://dup.test", Some("A"), &["B"]),
            bookmark("Third", "https://dup.test", Some("A"), &["B"]),
            bookmark("Elsewhere", "https://dup.test", Some("A"), &["C"]),
        ];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &DestinationSnapshot::default());

        let actions: Vec<CardAction> = plan.cards.iter().map(|c| c.action).collect();
        assert_eq!(
            actions,
            vec![
                CardAction::Create,
                CardAction::Skip,
                CardAction::Skip,
                CardAction::Create
            ]
        );
        assert_eq!(plan.stats.cards_to_create, 2);
        assert_eq!(plan.stats.cards_to_skip, 2);
    }

    #[test]
    fn test_existing_urls_skipped_in_reused_buckets() {
        let bookmarks = vec![
            bookmark("Docs", "https://docs.test", Some("Work"), &["Docs"]),
            bookmark("Work", "https://work.test", Some("Work"), &[]),
            bookmark("Fresh", "https://fresh.test", Some("Work"), &["Docs"]),
        ];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &work_snapshot());

        assert_eq!(plan.menus[0].action, EntityAction::Reuse);
        assert_eq!(plan.groups[0].action, EntityAction::Reuse);
        assert_eq!(plan.groups[0].existing_id, Some(70));

        let actions: Vec<CardAction> = plan.cards.iter().map(|c| c.action).collect();
        assert_eq!(
            actions,
            vec![CardAction::Skip, CardAction::Skip, CardAction::Create]
        );
    }

    #[test]
    fn test_new_group_under_existing_menu_has_empty_bucket() {
        // https://work.test exists directly under Work, not in the new group
        let bookmarks = vec![bookmark("Work", "https://work.test", Some("Work"), &["New"])];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &work_snapshot());

        assert_eq!(plan.groups[0].action, EntityAction::Create);
        assert_eq!(plan.cards[0].action, CardAction::Create);
    }

    #[test]
    fn test_group_reuse_is_scoped_to_parent_menu() {
        let bookmarks = vec![
            bookmark("In work", "https://1.test", Some("Work"), &["Docs"]),
            bookmark("In home", "https://2.test", Some("Home"), &["Docs"]),
        ];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &work_snapshot());

        assert_eq!(plan.groups.len(), 2);
        assert_ne!(plan.groups[0].key, plan.groups[1].key);
        assert_eq!(plan.groups[0].action, EntityAction::Reuse);
        assert_eq!(plan.groups[1].action, EntityAction::Create);
    }

    #[test]
    fn test_menu_lookup_is_case_sensitive() {
        let bookmarks = vec![bookmark("x", "https://x.test", Some("work"), &[])];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &work_snapshot());
        assert_eq!(plan.menus[0].action, EntityAction::Create);
    }

    #[test]
    fn test_orders_dense_per_scope_in_first_seen_order() {
        let bookmarks = vec![
            bookmark("a1", "https://a1.test", Some("A"), &["G2"]),
            bookmark("b1", "https://b1.test", Some("B"), &["G1"]),
            bookmark("a2", "https://a2.test", Some("A"), &["G1"]),
            bookmark("a3", "https://a3.test", Some("A"), &["G2"]),
            bookmark("a4", "https://a4.test", Some("A"), &[]),
        ];
        let plan = plan_with(&bookmarks, PlanTarget::Auto, &DestinationSnapshot::default());

        let menus: Vec<(&str, usize)> = plan.menus.iter().map(|m| (m.name.as_str(), m.order)).collect();
        assert_eq!(menus, vec![("A", 0), ("B", 1)]);

        let groups: Vec<(&str, &str, usize)> = plan
            .groups
            .iter()
            .map(|g| (g.menu_key.as_str(), g.name.as_str(), g.order))
            .collect();
        assert_eq!(
            groups,
            vec![("menu:A", "G2", 0), ("menu:B", "G1", 0), ("menu:A", "G1", 1)]
        );

        let cards: Vec<(&str, usize)> = plan.cards.iter().map(|c| (c.title.as_str(), c.order)).collect();
        assert_eq!(
            cards,
            vec![("a1", 0), ("b1", 0), ("a2", 0), ("a3", 1), ("a4", 0)]
        );
    }

    #[test]
    fn test_cleared_snapshot_replans_existing_urls_as_create() {
        let bookmarks = vec![
            bookmark("Docs", "https://docs.test", Some("Docs"), &[]),
            bookmark("Home", "https://home.test", None, &[]),
        ];

        let mut snapshot = work_snapshot();
        snapshot.clear_urls_for_menu(7);

        let plan = plan_with(
            &bookmarks,
            PlanTarget::Menu { id: 7, name: "Work".to_string() },
            &snapshot,
        );
        assert!(plan.cards.iter().all(|c| c.action == CardAction::Create));

        // Unrelated menu keeps its URLs
        let home = vec![bookmark("Home", "https://home.test", None, &[])];
        let plan = plan_with(&home, PlanTarget::Auto, &snapshot);
        assert_eq!(plan.cards[0].action, CardAction::Skip);
    }

    #[test]
    fn test_custom_options_change_fallback_and_separator() {
        let bookmarks = vec![
            bookmark("Loose", "https://loose.test", None, &[]),
            bookmark("Deep", "https://deep.test", Some("A"), &["B", "C"]),
        ];
        let options = PlannerOptions {
            fallback_menu_name: "Inbox".to_string(),
            group_separator: " > ".to_string(),
        };
        let plan = generate_import_plan(PlanRequest {
            bookmarks: &bookmarks,
            root_folders: &[],
            target: &PlanTarget::Auto,
            snapshot: &DestinationSnapshot::default(),
            options: &options,
        });

        assert_eq!(plan.menus[0].name, "Inbox");
        assert_eq!(plan.groups[0].name, "B > C");
        assert_eq!(plan.groups[0].key, "menu:A||group:B > C");
    }

    #[test]
    fn test_empty_input_yields_empty_plan() {
        let plan = plan_with(&[], PlanTarget::Auto, &work_snapshot());
        assert!(plan.menus.is_empty());
        assert_eq!(plan.stats, Default::default());
    }

    #[test]
    fn test_empty_root_folders_produce_no_menu() {
        let bookmarks = vec![bookmark("X", "https://x.test", Some("A"), &[])];
        let snapshot = DestinationSnapshot::default();
        let options = PlannerOptions::default();

        let with_empty_roots = generate_import_plan(PlanRequest {
            bookmarks: &bookmarks,
            root_folders: &["Empty".to_string(), "A".to_string()],
            target: &PlanTarget::Auto,
            snapshot: &snapshot,
            options: &options,
        });
        let without_roots = generate_import_plan(PlanRequest {
            bookmarks: &bookmarks,
            root_folders: &[],
            target: &PlanTarget::Auto,
            snapshot: &snapshot,
            options: &options,
        });

        let names: Vec<&str> = with_empty_roots.menus.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
        assert_eq!(with_empty_roots, without_roots);
    }
}

//! Round-trip properties of the unfold/fold codec.
//!
//! Every test builds a tree, flattens it, optionally disturbs the record
//! order, and checks that folding restores the tree field for field.

use graphlang_tree::{
    fold, unfold, unfold_with, CaseNode, DefaultNode, IdGenerator, RecordKind, Tree, TreeBlock,
    TreeNode, TreeNodeRecord,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A document exercising every node kind, nested branches and comments at
/// every level.
fn booking_flow() -> Tree {
    let choose_city = TreeNode::if_tree(
        "not_shanghai",
        vec![
            TreeNode::action("open_city_picker", vec![]),
            TreeNode::if_tree(
                "picker_loaded",
                vec![TreeNode::action("select_shanghai", strings(&["departure"]))],
                vec![TreeNode::goto("reload", vec![])],
                vec![],
            ),
        ],
        vec![TreeNode::action("keep_city", vec![])],
        strings(&["make sure we depart from Shanghai"]),
    );
    let by_city = TreeNode::switch(
        "current_city",
        vec![
            CaseNode::new("shanghai", vec![TreeNode::action("local_deals", vec![])], vec![]),
            CaseNode::new(
                "beijing",
                vec![],
                strings(&["nothing yet"]),
            ),
        ],
        Some(DefaultNode::new(
            vec![TreeNode::goto("fallback", vec![])],
            strings(&["anything else"]),
        )),
        vec![],
    );

    Tree::new(
        vec![
            TreeBlock::new(
                "order",
                vec![
                    TreeNode::goto("home", strings(&["start at home"])),
                    choose_city,
                    TreeNode::action("book_now", vec![]),
                    by_city,
                ],
                strings(&["main flow", "second line"]),
            ),
            TreeBlock::new("home", vec![TreeNode::action("open_home", vec![])], vec![]),
            TreeBlock::new("empty", vec![], vec![]),
        ],
        strings(&["order", "home"]),
        strings(&["file header"]),
    )
}

/// Deterministic reorder: odd positions reversed, then even positions.
fn shuffle(records: &[TreeNodeRecord]) -> Vec<TreeNodeRecord> {
    let odd = records.iter().skip(1).step_by(2).rev();
    let even = records.iter().step_by(2);
    odd.chain(even).cloned().collect()
}

#[test]
fn full_document_round_trips() {
    let tree = booking_flow();
    assert_eq!(fold(&unfold(&tree)), Ok(tree));
}

#[test]
fn empty_tree_round_trips() {
    let tree = Tree::default();
    assert_eq!(fold(&unfold(&tree)), Ok(tree));
}

#[test]
fn nested_if_with_both_branches_round_trips() {
    let tree = Tree::new(
        vec![TreeBlock::new(
            "guard",
            vec![TreeNode::if_tree(
                "outer",
                vec![TreeNode::if_tree(
                    "inner",
                    vec![TreeNode::action("a", vec![])],
                    vec![TreeNode::action("b", vec![])],
                    vec![],
                )],
                vec![TreeNode::action("c", vec![]), TreeNode::goto("d", vec![])],
                vec![],
            )],
            vec![],
        )],
        vec![],
        vec![],
    );
    assert_eq!(fold(&unfold(&tree)), Ok(tree));
}

#[test]
fn switch_with_two_cases_and_no_default_round_trips() {
    let tree = Tree::new(
        vec![TreeBlock::new(
            "route",
            vec![TreeNode::switch(
                "city",
                vec![
                    CaseNode::new("sh", vec![TreeNode::action("x", vec![])], vec![]),
                    CaseNode::new("bj", vec![TreeNode::action("y", vec![])], vec![]),
                ],
                None,
                vec![],
            )],
            vec![],
        )],
        vec![],
        vec![],
    );
    let records = unfold(&tree);
    assert_eq!(
        records
            .iter()
            .filter(|r| r.kind == RecordKind::DefaultNode)
            .count(),
        0,
        "absent default must not produce a record"
    );
    let folded = fold(&records).unwrap();
    match &folded.blocks[0].children[0] {
        TreeNode::SwitchTree(switch) => assert!(switch.default_child.is_none()),
        other => panic!("expected switch, got {:?}", other),
    }
    assert_eq!(folded, tree);
}

#[test]
fn sibling_order_survives_shuffled_input() {
    let tree = Tree::new(
        vec![TreeBlock::new(
            "steps",
            vec![
                TreeNode::action("a", vec![]),
                TreeNode::goto("b", vec![]),
                TreeNode::action("c", vec![]),
            ],
            vec![],
        )],
        vec![],
        vec![],
    );
    let records = unfold(&tree);
    let mut reversed = records.clone();
    reversed.reverse();

    assert_eq!(fold(&reversed), Ok(tree.clone()));
    assert_eq!(fold(&shuffle(&records)), Ok(tree));
}

#[test]
fn shuffled_full_document_round_trips() {
    let tree = booking_flow();
    let records = unfold(&tree);
    assert_eq!(fold(&shuffle(&records)), Ok(tree.clone()));
    assert_eq!(fold(&shuffle(&shuffle(&records))), Ok(tree));
}

#[test]
fn ids_are_not_part_of_the_comparison() {
    let tree = booking_flow();
    let mut ids = IdGenerator::starting_at(1_000);
    let records = unfold_with(&tree, &mut ids).unwrap();
    assert_eq!(records[0].id.0, 1_000);
    assert_eq!(fold(&records), Ok(tree));
}

#[test]
fn unfold_is_deterministic() {
    let tree = booking_flow();
    assert_eq!(unfold(&tree), unfold(&tree));
}

#[test]
fn exactly_one_root_and_every_parent_exists() {
    let records = unfold(&booking_flow());
    let roots: Vec<_> = records.iter().filter(|r| r.is_root()).collect();
    assert_eq!(roots.len(), 1);
    for record in &records {
        if let Some(parent) = record.parent_id {
            assert_eq!(
                records.iter().filter(|r| r.id == parent).count(),
                1,
                "parent of {:?}",
                record
            );
        }
        assert_eq!(record.kind.is_leaf(), record.content.is_some());
    }
}

#[test]
fn records_survive_json_transport() {
    let tree = booking_flow();
    let json = serde_json::to_string(&unfold(&tree)).unwrap();
    let records: Vec<TreeNodeRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(fold(&records), Ok(tree));
}

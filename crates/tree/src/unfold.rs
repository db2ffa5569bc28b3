//! Unfold: flatten a [`Tree`] into parent/sibling-indexed records.
//!
//! Traversal is pre-order. Every structural node emits its own record
//! first, then its singleton leaves (`floor_id` 0), then each of its
//! ordered lists with positions counted per list. The two branch lists of
//! an `IfTree` are each wrapped in a grouping record so that every list is
//! identified by exactly one `(parent_id, kind)` pair.

use crate::error::UnfoldError;
use crate::record::{IdGenerator, RecordId, RecordKind, TreeNodeRecord};
use crate::tree::{CaseNode, DefaultNode, Tree, TreeBlock, TreeNode};

/// Flatten `tree` with ids starting at 0.
pub fn unfold(tree: &Tree) -> Vec<TreeNodeRecord> {
    let mut unfolder = <Unfolder as Default>::default();
    unfolder.tree(tree);
    tracing::debug!(
        blocks = tree.blocks.len(),
        records = unfolder.records.len(),
        "unfolded tree"
    );
    unfolder.records
}

/// Flatten `tree`, drawing ids from `ids`.
///
/// The ids of one call are consecutive. Fails, leaving `ids` untouched, if
/// the generator cannot supply one id per record.
pub fn unfold_with(
    tree: &Tree,
    ids: &mut IdGenerator,
) -> Result<Vec<TreeNodeRecord>, UnfoldError> {
    let mut records = unfold(tree);
    let first = ids.reserve(records.len())?.0;
    // Local ids are below `records.len()`, which `reserve` checked.
    let shift = |id: RecordId| RecordId(first + id.0);
    for record in &mut records {
        record.id = shift(record.id);
        record.parent_id = record.parent_id.map(shift);
    }
    Ok(records)
}

/// Pre-order walk numbering records by their position in the output.
#[derive(Default)]
struct Unfolder {
    records: Vec<TreeNodeRecord>,
}

impl Unfolder {
    fn next_id(&self) -> RecordId {
        RecordId(self.records.len() as u64)
    }

    fn structural(
        &mut self,
        kind: RecordKind,
        parent_id: Option<RecordId>,
        floor_id: usize,
    ) -> RecordId {
        let id = self.next_id();
        self.records.push(TreeNodeRecord {
            id,
            parent_id,
            floor_id,
            kind,
            content: None,
        });
        id
    }

    fn leaf(&mut self, kind: RecordKind, parent_id: RecordId, floor_id: usize, content: &str) {
        let id = self.next_id();
        self.records.push(TreeNodeRecord {
            id,
            parent_id: Some(parent_id),
            floor_id,
            kind,
            content: Some(content.to_owned()),
        });
    }

    fn leaves(&mut self, kind: RecordKind, parent_id: RecordId, items: &[String]) {
        for (floor_id, item) in items.iter().enumerate() {
            self.leaf(kind, parent_id, floor_id, item);
        }
    }

    fn tree(&mut self, tree: &Tree) {
        let id = self.structural(RecordKind::Tree, None, 0);
        for (floor_id, block) in tree.blocks.iter().enumerate() {
            self.block(block, id, floor_id);
        }
        self.leaves(RecordKind::Start, id, &tree.starts);
        self.leaves(RecordKind::Comment, id, &tree.comments);
    }

    fn block(&mut self, block: &TreeBlock, parent_id: RecordId, floor_id: usize) {
        let id = self.structural(RecordKind::TreeBlock, Some(parent_id), floor_id);
        self.leaf(RecordKind::Name, id, 0, &block.name);
        self.nodes(&block.children, id);
        self.leaves(RecordKind::Comment, id, &block.comments);
    }

    fn nodes(&mut self, nodes: &[TreeNode], parent_id: RecordId) {
        for (floor_id, node) in nodes.iter().enumerate() {
            self.node(node, parent_id, floor_id);
        }
    }

    fn node(&mut self, node: &TreeNode, parent_id: RecordId, floor_id: usize) {
        match node {
            TreeNode::ActionNode(action) => {
                let id = self.structural(RecordKind::ActionNode, Some(parent_id), floor_id);
                self.leaf(RecordKind::Expression, id, 0, &action.expression);
                self.leaves(RecordKind::Comment, id, &action.comments);
            }
            TreeNode::GotoNode(goto) => {
                let id = self.structural(RecordKind::GotoNode, Some(parent_id), floor_id);
                self.leaf(RecordKind::Name, id, 0, &goto.name);
                self.leaves(RecordKind::Comment, id, &goto.comments);
            }
            TreeNode::IfTree(if_tree) => {
                let id = self.structural(RecordKind::IfTree, Some(parent_id), floor_id);
                self.leaf(RecordKind::Condition, id, 0, &if_tree.condition);
                let success = self.structural(RecordKind::SuccessBlock, Some(id), 0);
                self.nodes(&if_tree.success_children, success);
                let faild = self.structural(RecordKind::FaildBlock, Some(id), 0);
                self.nodes(&if_tree.faild_children, faild);
                self.leaves(RecordKind::Comment, id, &if_tree.comments);
            }
            TreeNode::SwitchTree(switch) => {
                let id = self.structural(RecordKind::SwitchTree, Some(parent_id), floor_id);
                self.leaf(RecordKind::Condition, id, 0, &switch.condition);
                for (floor_id, case) in switch.children.iter().enumerate() {
                    self.case(case, id, floor_id);
                }
                if let Some(default) = &switch.default_child {
                    self.default(default, id);
                }
                self.leaves(RecordKind::Comment, id, &switch.comments);
            }
        }
    }

    fn case(&mut self, case: &CaseNode, parent_id: RecordId, floor_id: usize) {
        let id = self.structural(RecordKind::CaseNode, Some(parent_id), floor_id);
        self.leaf(RecordKind::Expectation, id, 0, &case.expectation);
        self.nodes(&case.children, id);
        self.leaves(RecordKind::Comment, id, &case.comments);
    }

    fn default(&mut self, default: &DefaultNode, parent_id: RecordId) {
        let id = self.structural(RecordKind::DefaultNode, Some(parent_id), 0);
        self.nodes(&default.children, id);
        self.leaves(RecordKind::Comment, id, &default.comments);
    }
}

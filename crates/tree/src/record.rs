use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UnfoldError;

/// Identifier of a flat record.
///
/// Ids produced by [`IdGenerator`] are local to one unfold run. A storage
/// layer that needs ids stable across save/load cycles assigns its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a flat record.
///
/// Covers the structural tree kinds, the leaf kinds that carry string
/// content, and the two grouping kinds that give each branch list of an
/// `IfTree` its own parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Tree,
    TreeBlock,
    ActionNode,
    GotoNode,
    SwitchTree,
    CaseNode,
    DefaultNode,
    IfTree,
    // Leaves
    Start,
    Comment,
    Name,
    Expression,
    Condition,
    Expectation,
    // Grouping
    SuccessBlock,
    FaildBlock,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Tree => "Tree",
            RecordKind::TreeBlock => "TreeBlock",
            RecordKind::ActionNode => "ActionNode",
            RecordKind::GotoNode => "GotoNode",
            RecordKind::SwitchTree => "SwitchTree",
            RecordKind::CaseNode => "CaseNode",
            RecordKind::DefaultNode => "DefaultNode",
            RecordKind::IfTree => "IfTree",
            RecordKind::Start => "Start",
            RecordKind::Comment => "Comment",
            RecordKind::Name => "Name",
            RecordKind::Expression => "Expression",
            RecordKind::Condition => "Condition",
            RecordKind::Expectation => "Expectation",
            RecordKind::SuccessBlock => "SuccessBlock",
            RecordKind::FaildBlock => "FaildBlock",
        }
    }

    /// Leaf records carry string content and have no children.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            RecordKind::Start
                | RecordKind::Comment
                | RecordKind::Name
                | RecordKind::Expression
                | RecordKind::Condition
                | RecordKind::Expectation
        )
    }

    pub fn is_grouping(self) -> bool {
        matches!(self, RecordKind::SuccessBlock | RecordKind::FaildBlock)
    }

    /// Kinds that may appear in a list of block steps.
    pub fn is_tree_node(self) -> bool {
        matches!(
            self,
            RecordKind::ActionNode
                | RecordKind::GotoNode
                | RecordKind::IfTree
                | RecordKind::SwitchTree
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNodeRecord {
    pub id: RecordId,
    /// `None` only for the document root.
    pub parent_id: Option<RecordId>,
    /// Position among the siblings of the same relation (same parent, same
    /// list), starting at 0.
    pub floor_id: usize,
    pub kind: RecordKind,
    /// Present iff `kind` is a leaf kind.
    pub content: Option<String>,
}

impl TreeNodeRecord {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none() && self.kind == RecordKind::Tree
    }
}

/// Sequential id source for one or more unfold runs.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator::default()
    }

    pub fn starting_at(first: u64) -> Self {
        IdGenerator { next: first }
    }

    /// Take `count` consecutive ids and return the first one.
    ///
    /// Fails without consuming anything when the ids would run past
    /// `u64::MAX`.
    pub fn reserve(&mut self, count: usize) -> Result<RecordId, UnfoldError> {
        let first = RecordId(self.next);
        let end = u64::try_from(count)
            .ok()
            .and_then(|n| self.next.checked_add(n))
            .ok_or(UnfoldError::IdsExhausted { first, count })?;
        self.next = end;
        Ok(first)
    }

    /// The id the next reservation starts at.
    pub fn peek(&self) -> RecordId {
        RecordId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_camel_case_with_null_root_parent() {
        let root = TreeNodeRecord {
            id: RecordId(0),
            parent_id: None,
            floor_id: 0,
            kind: RecordKind::Tree,
            content: None,
        };
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 0,
                "parentId": null,
                "floorId": 0,
                "kind": "Tree",
                "content": null,
            })
        );
        assert!(root.is_root());
    }

    #[test]
    fn leaf_and_grouping_classification() {
        assert!(RecordKind::Comment.is_leaf());
        assert!(!RecordKind::Comment.is_tree_node());
        assert!(RecordKind::FaildBlock.is_grouping());
        assert!(!RecordKind::FaildBlock.is_leaf());
        assert!(RecordKind::SwitchTree.is_tree_node());
        assert!(!RecordKind::CaseNode.is_tree_node());
    }

    #[test]
    fn id_generator_counts_from_its_start() {
        let mut ids = IdGenerator::starting_at(7);
        assert_eq!(ids.reserve(1), Ok(RecordId(7)));
        assert_eq!(ids.reserve(3), Ok(RecordId(8)));
        assert_eq!(ids.peek(), RecordId(11));
    }

    #[test]
    fn reservation_past_the_id_space_fails_without_consuming() {
        let mut ids = IdGenerator::starting_at(u64::MAX - 2);
        assert_eq!(
            ids.reserve(3),
            Err(UnfoldError::IdsExhausted {
                first: RecordId(u64::MAX - 2),
                count: 3,
            })
        );
        assert_eq!(ids.peek(), RecordId(u64::MAX - 2));
        assert_eq!(ids.reserve(2), Ok(RecordId(u64::MAX - 2)));
        assert_eq!(ids.reserve(0), Ok(RecordId(u64::MAX)));
        assert!(ids.reserve(1).is_err());
    }
}

//! The Tree Model: the normalized control-flow representation that is
//! persisted and edited.
//!
//! It is deliberately separate from the parser's AST. A tree carries only
//! what a flow needs to be stored and re-rendered: named blocks, their
//! ordered steps and branches, start names and comment lines.

use serde::{Deserialize, Serialize};

/// Deepest brace nesting a flow document may have.
///
/// A definition's own block is level 1; every `if`, `else`, `switch`,
/// `case` and `default` body adds one level. The parser and [`crate::fold`]
/// both reject anything deeper.
pub const MAX_NESTING: usize = 128;

// ──────────────────────────────────────────────
// Document root
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub blocks: Vec<TreeBlock>,
    /// Names of the blocks flows start from, in source order.
    pub starts: Vec<String>,
    pub comments: Vec<String>,
}

impl Tree {
    pub fn new(blocks: Vec<TreeBlock>, starts: Vec<String>, comments: Vec<String>) -> Self {
        Tree {
            blocks,
            starts,
            comments,
        }
    }

    /// Look up a block by name. Names are not required to be unique; the
    /// first match wins.
    pub fn block(&self, name: &str) -> Option<&TreeBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn is_start(&self, name: &str) -> bool {
        self.starts.iter().any(|s| s == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeBlock {
    pub name: String,
    pub children: Vec<TreeNode>,
    pub comments: Vec<String>,
}

impl TreeBlock {
    pub fn new(name: impl Into<String>, children: Vec<TreeNode>, comments: Vec<String>) -> Self {
        TreeBlock {
            name: name.into(),
            children,
            comments,
        }
    }
}

// ──────────────────────────────────────────────
// Nodes
// ──────────────────────────────────────────────

/// One step of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TreeNode {
    ActionNode(ActionNode),
    GotoNode(GotoNode),
    IfTree(IfTree),
    SwitchTree(SwitchTree),
}

impl TreeNode {
    pub fn action(expression: impl Into<String>, comments: Vec<String>) -> Self {
        TreeNode::ActionNode(ActionNode::new(expression, comments))
    }

    pub fn goto(name: impl Into<String>, comments: Vec<String>) -> Self {
        TreeNode::GotoNode(GotoNode::new(name, comments))
    }

    pub fn if_tree(
        condition: impl Into<String>,
        success_children: Vec<TreeNode>,
        faild_children: Vec<TreeNode>,
        comments: Vec<String>,
    ) -> Self {
        TreeNode::IfTree(IfTree::new(
            condition,
            success_children,
            faild_children,
            comments,
        ))
    }

    pub fn switch(
        condition: impl Into<String>,
        children: Vec<CaseNode>,
        default_child: Option<DefaultNode>,
        comments: Vec<String>,
    ) -> Self {
        TreeNode::SwitchTree(SwitchTree::new(
            condition,
            children,
            default_child,
            comments,
        ))
    }

    pub fn comments(&self) -> &[String] {
        match self {
            TreeNode::ActionNode(n) => &n.comments,
            TreeNode::GotoNode(n) => &n.comments,
            TreeNode::IfTree(n) => &n.comments,
            TreeNode::SwitchTree(n) => &n.comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionNode {
    pub expression: String,
    pub comments: Vec<String>,
}

impl ActionNode {
    pub fn new(expression: impl Into<String>, comments: Vec<String>) -> Self {
        ActionNode {
            expression: expression.into(),
            comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoNode {
    /// Name of the target block.
    pub name: String,
    pub comments: Vec<String>,
}

impl GotoNode {
    pub fn new(name: impl Into<String>, comments: Vec<String>) -> Self {
        GotoNode {
            name: name.into(),
            comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfTree {
    pub condition: String,
    pub success_children: Vec<TreeNode>,
    /// Steps of the `else` branch; empty when the branch is absent.
    pub faild_children: Vec<TreeNode>,
    pub comments: Vec<String>,
}

impl IfTree {
    pub fn new(
        condition: impl Into<String>,
        success_children: Vec<TreeNode>,
        faild_children: Vec<TreeNode>,
        comments: Vec<String>,
    ) -> Self {
        IfTree {
            condition: condition.into(),
            success_children,
            faild_children,
            comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTree {
    pub condition: String,
    pub children: Vec<CaseNode>,
    pub default_child: Option<DefaultNode>,
    pub comments: Vec<String>,
}

impl SwitchTree {
    pub fn new(
        condition: impl Into<String>,
        children: Vec<CaseNode>,
        default_child: Option<DefaultNode>,
        comments: Vec<String>,
    ) -> Self {
        SwitchTree {
            condition: condition.into(),
            children,
            default_child,
            comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseNode {
    pub expectation: String,
    pub children: Vec<TreeNode>,
    pub comments: Vec<String>,
}

impl CaseNode {
    pub fn new(expectation: impl Into<String>, children: Vec<TreeNode>, comments: Vec<String>) -> Self {
        CaseNode {
            expectation: expectation.into(),
            children,
            comments,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultNode {
    pub children: Vec<TreeNode>,
    pub comments: Vec<String>,
}

impl DefaultNode {
    pub fn new(children: Vec<TreeNode>, comments: Vec<String>) -> Self {
        DefaultNode { children, comments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_serializes_with_kind_tag_and_camel_case_fields() {
        let node = TreeNode::if_tree(
            "logged_in",
            vec![TreeNode::action("open", vec![])],
            vec![],
            vec![],
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "IfTree");
        assert_eq!(json["successChildren"][0]["kind"], "ActionNode");
        assert_eq!(json["faildChildren"], serde_json::json!([]));

        let back: TreeNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn absent_default_serializes_as_null() {
        let node = TreeNode::switch("city", vec![], None, vec![]);
        let json = serde_json::to_value(&node).unwrap();
        assert!(json["defaultChild"].is_null());
    }

    #[test]
    fn block_lookup_and_start_membership() {
        let tree = Tree::new(
            vec![
                TreeBlock::new("order", vec![], vec![]),
                TreeBlock::new("pay", vec![], vec![]),
            ],
            vec!["order".to_string()],
            vec![],
        );
        assert_eq!(tree.block("pay").map(|b| b.name.as_str()), Some("pay"));
        assert!(tree.block("missing").is_none());
        assert!(tree.is_start("order"));
        assert!(!tree.is_start("pay"));
    }
}

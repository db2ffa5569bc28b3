//! graphlang-tree: the Tree Model and its flat record codec.
//!
//! A [`Tree`] is the persisted and edited form of a flow document.
//! [`unfold`] flattens it into [`TreeNodeRecord`]s indexed by parent id and
//! sibling position; [`fold`] rebuilds the tree from those records in any
//! order. `fold(&unfold(&t)) == Ok(t)` for every tree.

mod error;
mod fold;
mod record;
mod store;
mod tree;
mod unfold;

pub use error::{FoldError, StoreError, UnfoldError};
pub use fold::fold;
pub use record::{IdGenerator, RecordId, RecordKind, TreeNodeRecord};
pub use store::{load_tree, save_tree, InMemoryStore, RecordStore};
pub use tree::{
    ActionNode, CaseNode, DefaultNode, GotoNode, IfTree, SwitchTree, Tree, TreeBlock, TreeNode,
    MAX_NESTING,
};
pub use unfold::{unfold, unfold_with};

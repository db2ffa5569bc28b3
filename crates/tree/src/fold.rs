//! Fold: rebuild a [`Tree`] from its flat records.
//!
//! The input order is irrelevant. Children are grouped by parent id once,
//! list relations are re-sorted by `floor_id`, and singleton relations must
//! match exactly one record. Every record must be reached by the walk.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::FoldError;
use crate::record::{RecordId, RecordKind, TreeNodeRecord};
use crate::tree::{
    ActionNode, CaseNode, DefaultNode, GotoNode, IfTree, SwitchTree, Tree, TreeBlock, TreeNode,
    MAX_NESTING,
};

pub fn fold(records: &[TreeNodeRecord]) -> Result<Tree, FoldError> {
    let folder = Folder::index(records).inspect_err(|e| {
        tracing::warn!(error = %e, records = records.len(), "rejected record set");
    })?;
    let tree = folder
        .tree()
        .and_then(|tree| folder.check_all_reached(records).map(|()| tree))
        .inspect_err(|e| {
            tracing::warn!(error = %e, records = records.len(), "record set does not form a tree");
        })?;
    tracing::debug!(
        records = records.len(),
        blocks = tree.blocks.len(),
        "folded records"
    );
    Ok(tree)
}

/// The record kinds that fold into a [`TreeNode`].
#[derive(Clone, Copy)]
enum StepKind {
    Action,
    Goto,
    If,
    Switch,
}

impl StepKind {
    fn of(kind: RecordKind) -> Option<Self> {
        match kind {
            RecordKind::ActionNode => Some(StepKind::Action),
            RecordKind::GotoNode => Some(StepKind::Goto),
            RecordKind::IfTree => Some(StepKind::If),
            RecordKind::SwitchTree => Some(StepKind::Switch),
            RecordKind::Tree
            | RecordKind::TreeBlock
            | RecordKind::CaseNode
            | RecordKind::DefaultNode
            | RecordKind::Start
            | RecordKind::Comment
            | RecordKind::Name
            | RecordKind::Expression
            | RecordKind::Condition
            | RecordKind::Expectation
            | RecordKind::SuccessBlock
            | RecordKind::FaildBlock => None,
        }
    }
}

/// Selector for a list relation made of a single kind.
fn only(kind: RecordKind) -> impl Fn(RecordKind) -> Option<()> {
    move |k| (k == kind).then_some(())
}

struct Folder<'a> {
    root: &'a TreeNodeRecord,
    children: HashMap<RecordId, Vec<&'a TreeNodeRecord>>,
    /// Ids handed out by `list` and `optional` so far.
    reached: RefCell<HashSet<RecordId>>,
}

impl<'a> Folder<'a> {
    /// Validate record-level invariants and group records by parent.
    fn index(records: &'a [TreeNodeRecord]) -> Result<Self, FoldError> {
        let mut ids = HashSet::with_capacity(records.len());
        let mut roots = Vec::new();
        let mut children: HashMap<RecordId, Vec<&'a TreeNodeRecord>> = HashMap::new();

        for record in records {
            if !ids.insert(record.id) {
                return Err(FoldError::DuplicateId { id: record.id });
            }
            if record.kind.is_leaf() != record.content.is_some() {
                return Err(FoldError::InvalidContent {
                    id: record.id,
                    kind: record.kind,
                });
            }
            match record.parent_id {
                None if record.kind == RecordKind::Tree => roots.push(record),
                None => {
                    return Err(FoldError::MissingParent {
                        id: record.id,
                        kind: record.kind,
                    })
                }
                Some(parent_id) => children.entry(parent_id).or_default().push(record),
            }
        }

        for record in records {
            if let Some(parent_id) = record.parent_id {
                if !ids.contains(&parent_id) {
                    return Err(FoldError::DanglingParent {
                        id: record.id,
                        parent_id,
                    });
                }
            }
        }

        let root = match roots.as_slice() {
            [] => return Err(FoldError::MissingRoot),
            [root] => *root,
            _ => return Err(FoldError::MultipleRoots { count: roots.len() }),
        };

        Ok(Folder {
            root,
            children,
            reached: RefCell::new(HashSet::from([root.id])),
        })
    }

    /// Fail on the lowest-id record the walk never took.
    fn check_all_reached(&self, records: &[TreeNodeRecord]) -> Result<(), FoldError> {
        let reached = self.reached.borrow();
        match records
            .iter()
            .filter(|r| !reached.contains(&r.id))
            .min_by_key(|r| r.id)
        {
            Some(r) => Err(FoldError::UnreachableRecord {
                id: r.id,
                kind: r.kind,
            }),
            None => Ok(()),
        }
    }

    fn take(&self, record: &TreeNodeRecord) {
        self.reached.borrow_mut().insert(record.id);
    }

    fn under(&self, parent: RecordId) -> impl Iterator<Item = &'a TreeNodeRecord> + '_ {
        self.children.get(&parent).into_iter().flatten().copied()
    }

    /// All records of one list relation, in `floor_id` order, each paired
    /// with what `select` made of its kind.
    fn list<T>(
        &self,
        parent: RecordId,
        select: impl Fn(RecordKind) -> Option<T>,
    ) -> Result<Vec<(&'a TreeNodeRecord, T)>, FoldError> {
        let mut list: Vec<_> = self
            .under(parent)
            .filter_map(|r| select(r.kind).map(|t| (r, t)))
            .collect();
        list.sort_by_key(|(r, _)| r.floor_id);
        if let Some(pair) = list.windows(2).find(|w| w[0].0.floor_id == w[1].0.floor_id) {
            return Err(FoldError::DuplicateFloor {
                parent,
                kind: pair[1].0.kind,
                floor_id: pair[1].0.floor_id,
            });
        }
        for (r, _) in &list {
            self.take(r);
        }
        Ok(list)
    }

    fn optional(
        &self,
        parent: RecordId,
        kind: RecordKind,
    ) -> Result<Option<&'a TreeNodeRecord>, FoldError> {
        let mut matches = self.under(parent).filter(|r| r.kind == kind);
        let first = matches.next();
        if first.is_some() && matches.next().is_some() {
            return Err(FoldError::DuplicateChild { parent, kind });
        }
        if let Some(r) = first {
            self.take(r);
        }
        Ok(first)
    }

    fn single(&self, parent: RecordId, kind: RecordKind) -> Result<&'a TreeNodeRecord, FoldError> {
        self.optional(parent, kind)?
            .ok_or(FoldError::MissingChild { parent, kind })
    }

    fn content(record: &TreeNodeRecord) -> Result<String, FoldError> {
        record.content.clone().ok_or(FoldError::InvalidContent {
            id: record.id,
            kind: record.kind,
        })
    }

    fn leaf(&self, parent: RecordId, kind: RecordKind) -> Result<String, FoldError> {
        Self::content(self.single(parent, kind)?)
    }

    fn leaves(&self, parent: RecordId, kind: RecordKind) -> Result<Vec<String>, FoldError> {
        self.list(parent, only(kind))?
            .into_iter()
            .map(|(r, ())| Self::content(r))
            .collect()
    }

    fn comments(&self, parent: RecordId) -> Result<Vec<String>, FoldError> {
        self.leaves(parent, RecordKind::Comment)
    }

    fn tree(&self) -> Result<Tree, FoldError> {
        let id = self.root.id;
        let blocks = self
            .list(id, only(RecordKind::TreeBlock))?
            .into_iter()
            .map(|(r, ())| self.block(r.id))
            .collect::<Result<_, _>>()?;
        let starts = self.leaves(id, RecordKind::Start)?;
        let comments = self.comments(id)?;
        Ok(Tree::new(blocks, starts, comments))
    }

    fn block(&self, id: RecordId) -> Result<TreeBlock, FoldError> {
        let name = self.leaf(id, RecordKind::Name)?;
        let children = self.nodes(id, 1)?;
        let comments = self.comments(id)?;
        Ok(TreeBlock::new(name, children, comments))
    }

    /// The steps under `parent`, whose body sits at brace level `depth`.
    fn nodes(&self, parent: RecordId, depth: usize) -> Result<Vec<TreeNode>, FoldError> {
        if depth > MAX_NESTING {
            return Err(FoldError::TooDeep {
                id: parent,
                limit: MAX_NESTING,
            });
        }
        self.list(parent, StepKind::of)?
            .into_iter()
            .map(|(r, kind)| self.node(r.id, kind, depth))
            .collect()
    }

    fn node(&self, id: RecordId, kind: StepKind, depth: usize) -> Result<TreeNode, FoldError> {
        let node = match kind {
            StepKind::Action => TreeNode::ActionNode(ActionNode::new(
                self.leaf(id, RecordKind::Expression)?,
                self.comments(id)?,
            )),
            StepKind::Goto => TreeNode::GotoNode(GotoNode::new(
                self.leaf(id, RecordKind::Name)?,
                self.comments(id)?,
            )),
            StepKind::If => {
                let condition = self.leaf(id, RecordKind::Condition)?;
                let success = self.single(id, RecordKind::SuccessBlock)?;
                let faild = self.single(id, RecordKind::FaildBlock)?;
                TreeNode::IfTree(IfTree::new(
                    condition,
                    self.nodes(success.id, depth + 1)?,
                    self.nodes(faild.id, depth + 1)?,
                    self.comments(id)?,
                ))
            }
            StepKind::Switch => {
                let condition = self.leaf(id, RecordKind::Condition)?;
                // Clause bodies sit one level inside the switch braces.
                let children = self
                    .list(id, only(RecordKind::CaseNode))?
                    .into_iter()
                    .map(|(r, ())| self.case(r.id, depth + 2))
                    .collect::<Result<_, _>>()?;
                let default_child = match self.optional(id, RecordKind::DefaultNode)? {
                    Some(r) => Some(self.default(r.id, depth + 2)?),
                    None => None,
                };
                TreeNode::SwitchTree(SwitchTree::new(
                    condition,
                    children,
                    default_child,
                    self.comments(id)?,
                ))
            }
        };
        Ok(node)
    }

    fn case(&self, id: RecordId, depth: usize) -> Result<CaseNode, FoldError> {
        Ok(CaseNode::new(
            self.leaf(id, RecordKind::Expectation)?,
            self.nodes(id, depth)?,
            self.comments(id)?,
        ))
    }

    fn default(&self, id: RecordId, depth: usize) -> Result<DefaultNode, FoldError> {
        Ok(DefaultNode::new(self.nodes(id, depth)?, self.comments(id)?))
    }
}

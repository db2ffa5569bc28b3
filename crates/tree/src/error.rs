use crate::record::{RecordId, RecordKind};

/// A record set that cannot be folded back into a tree.
///
/// These are fatal for the document being loaded: they mean the flat store
/// holds corrupted or incompatible data, not that the user wrote bad source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FoldError {
    #[error("cannot find the root record of the document")]
    MissingRoot,

    #[error("document has {count} root records, expected exactly one")]
    MultipleRoots { count: usize },

    #[error("record id {id} appears more than once")]
    DuplicateId { id: RecordId },

    /// A non-root record without a parent id.
    #[error("{kind} record {id} has no parent")]
    MissingParent { id: RecordId, kind: RecordKind },

    #[error("record {id} references parent {parent_id}, which does not exist")]
    DanglingParent { id: RecordId, parent_id: RecordId },

    #[error("cannot find the {kind} record of record {parent}")]
    MissingChild { parent: RecordId, kind: RecordKind },

    #[error("record {parent} has more than one {kind} record")]
    DuplicateChild { parent: RecordId, kind: RecordKind },

    /// Leaf records must carry content; structural records must not.
    #[error("{kind} record {id} has invalid content")]
    InvalidContent { id: RecordId, kind: RecordKind },

    /// Two siblings of one list relation claim the same position.
    #[error("record {parent} has two {kind} children at floor {floor_id}")]
    DuplicateFloor {
        parent: RecordId,
        kind: RecordKind,
        floor_id: usize,
    },

    /// A record the tree walk never reaches: wrong kind for its parent, or
    /// part of a parent cycle.
    #[error("{kind} record {id} is not reachable from the root")]
    UnreachableRecord { id: RecordId, kind: RecordKind },

    #[error("record {id} is nested deeper than {limit} levels")]
    TooDeep { id: RecordId, limit: usize },
}

/// A tree that cannot be flattened with the ids at hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnfoldError {
    #[error("cannot assign {count} record ids starting at {first}: id space exhausted")]
    IdsExhausted { first: RecordId, count: usize },
}

/// All errors that can be returned by a [`crate::RecordStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {document_id}")]
    DocumentNotFound { document_id: String },

    /// The stored records exist but do not form a valid tree.
    #[error("document {document_id} cannot be reconstructed: {source}")]
    Fold {
        document_id: String,
        #[source]
        source: FoldError,
    },

    /// A backend-specific storage error (connection, serialization, etc.).
    #[error("store backend error: {0}")]
    Backend(String),
}

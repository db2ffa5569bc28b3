//! Record store abstraction at the persistence boundary.
//!
//! The [`RecordStore`] trait is the seam between the codec and whatever
//! storage or sync layer keeps documents. A store always receives and
//! returns the complete record set of one document; partial updates are
//! the backend's own business.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::fold::fold;
use crate::record::TreeNodeRecord;
use crate::tree::Tree;
use crate::unfold::unfold;

pub trait RecordStore {
    /// Replace the stored records of `document_id`.
    fn save_document(
        &mut self,
        document_id: &str,
        records: Vec<TreeNodeRecord>,
    ) -> Result<(), StoreError>;

    /// Read back every record of `document_id`, in no particular order.
    ///
    /// Returns `Err(StoreError::DocumentNotFound)` if nothing was saved under that id.
    fn load_document(&self, document_id: &str) -> Result<Vec<TreeNodeRecord>, StoreError>;

    fn delete_document(&mut self, document_id: &str) -> Result<(), StoreError>;

    fn document_ids(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory record store for tooling and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: BTreeMap<String, Vec<TreeNodeRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }
}

impl RecordStore for InMemoryStore {
    fn save_document(
        &mut self,
        document_id: &str,
        records: Vec<TreeNodeRecord>,
    ) -> Result<(), StoreError> {
        self.documents.insert(document_id.to_owned(), records);
        Ok(())
    }

    fn load_document(&self, document_id: &str) -> Result<Vec<TreeNodeRecord>, StoreError> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound {
                document_id: document_id.to_owned(),
            })
    }

    fn delete_document(&mut self, document_id: &str) -> Result<(), StoreError> {
        self.documents
            .remove(document_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::DocumentNotFound {
                document_id: document_id.to_owned(),
            })
    }

    fn document_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.documents.keys().cloned().collect())
    }
}

/// Unfold `tree` and save its records. Returns the number of records written.
pub fn save_tree<S: RecordStore + ?Sized>(
    store: &mut S,
    document_id: &str,
    tree: &Tree,
) -> Result<usize, StoreError> {
    let records = unfold(tree);
    let count = records.len();
    store.save_document(document_id, records)?;
    tracing::debug!(document_id, records = count, "saved document");
    Ok(count)
}

/// Load the records of `document_id` and fold them back into a tree.
pub fn load_tree<S: RecordStore + ?Sized>(store: &S, document_id: &str) -> Result<Tree, StoreError> {
    let records = store.load_document(document_id)?;
    fold(&records).map_err(|source| StoreError::Fold {
        document_id: document_id.to_owned(),
        source,
    })
}

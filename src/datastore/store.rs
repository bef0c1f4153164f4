//! In-memory document store
//!
//! The authoritative document collection: revision-stamped writes, removal,
//! and a broadcast change feed. Replication and durability live outside
//! this crate; this store is the embedded default and the test double for
//! the storage contract.

use std::collections::BTreeMap;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::{Document, Revision};

use super::errors::{StoreError, StoreResult};

/// Change feed buffer; lagging subscribers miss events rather than block
const CHANGE_FEED_CAPACITY: usize = 256;

/// Kind of change emitted on the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// First write of the id
    Created,
    /// Subsequent write of the id
    Updated,
    /// Removal of the id
    Deleted,
}

/// One change-feed event
#[derive(Debug, Clone)]
pub struct Change {
    /// The document as written (or as it was at removal)
    pub document: Document,
    /// What happened
    pub change_type: ChangeType,
}

/// In-memory key-value document store with a change feed
pub struct DocumentStore {
    /// Documents by id, iterated in id order on replay
    documents: BTreeMap<String, Document>,
    /// Monotonically increasing write sequence
    seq: u64,
    changes: broadcast::Sender<Change>,
}

impl DocumentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            documents: BTreeMap::new(),
            seq: 0,
            changes,
        }
    }

    /// Returns the document under the id
    pub fn get(&self, id: &str) -> StoreResult<&Document> {
        self.documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Writes a document, assigning a fresh revision.
    ///
    /// Creates require no revision; updates must carry the stored revision
    /// token or the write is rejected as a conflict. Returns the stamped
    /// document and emits a change event.
    pub fn put(&mut self, mut document: Document) -> StoreResult<Document> {
        if document.resource.id.is_empty() {
            return Err(StoreError::MissingId);
        }
        let id = document.resource.id.clone();

        let change_type = match self.documents.get(&id) {
            Some(existing) => {
                if existing.revision != document.revision {
                    return Err(StoreError::RevisionConflict(id));
                }
                ChangeType::Updated
            }
            None => {
                if document.revision.is_some() {
                    return Err(StoreError::RevisionConflict(id));
                }
                ChangeType::Created
            }
        };

        self.seq += 1;
        document.revision = Some(Revision {
            seq: self.seq,
            token: Uuid::new_v4(),
        });
        self.documents.insert(id, document.clone());

        // No subscribers is fine; the feed is best-effort
        let _ = self.changes.send(Change {
            document: document.clone(),
            change_type,
        });
        Ok(document)
    }

    /// Removes a document, returning its last state
    pub fn remove(&mut self, id: &str) -> StoreResult<Document> {
        let document = self
            .documents
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let _ = self.changes.send(Change {
            document: document.clone(),
            change_type: ChangeType::Deleted,
        });
        Ok(document)
    }

    /// Subscribes to the change feed.
    ///
    /// Subscribers that fall behind observe a lag gap and should trigger a
    /// full reindex to resynchronize.
    pub fn changes(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }

    /// Iterates all live documents in id order
    pub fn all(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Returns true if the id is present
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Returns the number of live documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_assigns_revision() {
        let mut store = DocumentStore::new();
        let stored = store.put(Document::new("t1", "T01", "Trench")).unwrap();

        let revision = stored.revision.as_ref().expect("revision assigned");
        assert_eq!(revision.seq, 1);
        assert_eq!(store.get("t1").unwrap(), &stored);
    }

    #[test]
    fn test_update_requires_current_revision() {
        let mut store = DocumentStore::new();
        let stored = store.put(Document::new("t1", "T01", "Trench")).unwrap();

        // Stale write without the stored revision
        let result = store.put(Document::new("t1", "T01-b", "Trench"));
        assert!(matches!(result, Err(StoreError::RevisionConflict(_))));

        // Carrying the stored revision succeeds and re-stamps
        let mut update = stored.clone();
        update.resource.identifier = "T01-b".to_string();
        let updated = store.put(update).unwrap();
        assert_ne!(updated.revision, stored.revision);
        assert_eq!(store.get("t1").unwrap().resource.identifier, "T01-b");
    }

    #[test]
    fn test_create_with_revision_rejected() {
        let mut store = DocumentStore::new();
        let mut doc = Document::new("t1", "T01", "Trench");
        doc.revision = Some(Revision {
            seq: 9,
            token: Uuid::new_v4(),
        });
        assert!(matches!(
            store.put(doc),
            Err(StoreError::RevisionConflict(_))
        ));
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut store = DocumentStore::new();
        assert!(matches!(store.remove("t1"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_change_feed_emits_lifecycle() {
        let mut store = DocumentStore::new();
        let mut feed = store.changes();

        let stored = store.put(Document::new("t1", "T01", "Trench")).unwrap();
        let mut update = stored;
        update.resource.identifier = "T01-b".to_string();
        store.put(update).unwrap();
        store.remove("t1").unwrap();

        assert_eq!(feed.try_recv().unwrap().change_type, ChangeType::Created);
        assert_eq!(feed.try_recv().unwrap().change_type, ChangeType::Updated);
        assert_eq!(feed.try_recv().unwrap().change_type, ChangeType::Deleted);
    }

    #[test]
    fn test_all_iterates_in_id_order() {
        let mut store = DocumentStore::new();
        for id in ["c", "a", "b"] {
            store.put(Document::new(id, id.to_uppercase(), "Trench")).unwrap();
        }
        let ids: Vec<&str> = store.all().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}

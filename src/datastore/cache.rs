//! Document cache
//!
//! Single authoritative in-memory copy per id, used to materialize query
//! results without cloning full documents per hit. The cache never holds
//! two distinct objects for the same id at once: setting an id replaces
//! its entry for all future readers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::Document;

/// Id-keyed cache of shared document handles
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: HashMap<String, Arc<Document>>,
}

impl DocumentCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached copy for the document's id, returning the handle
    pub fn set(&mut self, document: Document) -> Arc<Document> {
        let id = document.resource.id.clone();
        let handle = Arc::new(document);
        self.documents.insert(id, Arc::clone(&handle));
        handle
    }

    /// Returns the cached handle for an id
    pub fn get(&self, id: &str) -> Option<Arc<Document>> {
        self.documents.get(id).cloned()
    }

    /// Drops the cached copy for an id
    pub fn remove(&mut self, id: &str) {
        self.documents.remove(id);
    }

    /// Drops all cached copies
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Returns the number of cached documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_single_copy() {
        let mut cache = DocumentCache::new();
        cache.set(Document::new("t1", "T01", "Trench"));
        let first = cache.get("t1").unwrap();

        cache.set(Document::new("t1", "T01-renamed", "Trench"));
        let second = cache.get("t1").unwrap();

        // New readers see exactly one authoritative copy
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.resource.identifier, "T01-renamed");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut cache = DocumentCache::new();
        cache.set(Document::new("t1", "T01", "Trench"));
        cache.remove("t1");
        assert!(cache.get("t1").is_none());
    }
}

//! Index item projection
//!
//! Indexes never hold full documents. Each bucket entry is the minimal
//! projection needed for set operations and downstream sorting, decoupling
//! index state from later document mutation.

use chrono::{DateTime, Utc};

use crate::model::Document;

/// Minimal projection of a document stored in index buckets
#[derive(Debug, Clone, PartialEq)]
pub struct IndexItem {
    /// Document id
    pub id: String,
    /// Human-readable label, used for sorting and free-text matching
    pub identifier: String,
    /// Category (type tag)
    pub category: String,
    /// Creation date, when the document carries one
    pub date: Option<DateTime<Utc>>,
}

impl IndexItem {
    /// Projects a document down to its index item
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.resource.id.clone(),
            identifier: document.resource.identifier.clone(),
            category: document.resource.category.clone(),
            date: document.created.as_ref().map(|action| action.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;

    #[test]
    fn test_projection() {
        let doc = Document::new("f1", "FIND-001", "Find")
            .with_created(Action::now("anna"))
            .with_field("material", "ceramic");

        let item = IndexItem::from_document(&doc);
        assert_eq!(item.id, "f1");
        assert_eq!(item.identifier, "FIND-001");
        assert_eq!(item.category, "Find");
        assert!(item.date.is_some());
    }

    #[test]
    fn test_projection_without_created() {
        let item = IndexItem::from_document(&Document::new("t1", "T01", "Trench"));
        assert!(item.date.is_none());
    }
}

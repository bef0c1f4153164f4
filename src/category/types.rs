//! Category definition types
//!
//! One `CategoryDef` per category. Indexable fields and relations are
//! declared per category; the registry aggregates them for index
//! registration.

use serde::{Deserialize, Serialize};

/// A single category definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDef {
    /// Category name, unique across the registry
    pub name: String,
    /// Parent category name, absent for top-level categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Resource fields indexable for exact-match and presence lookups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Relations indexable for target-membership and presence lookups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<String>,
    /// Relations whose transitive closure is queryable (searchRecursively)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recursive_relations: Vec<String>,
}

impl CategoryDef {
    /// Creates a top-level category with no indexable members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            relations: Vec::new(),
            recursive_relations: Vec::new(),
        }
    }

    /// Sets the parent category
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declares an indexable field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Declares an indexable relation
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relations.push(relation.into());
        self
    }

    /// Declares a recursive relation (also indexable as a plain relation)
    pub fn with_recursive_relation(mut self, relation: impl Into<String>) -> Self {
        let relation = relation.into();
        self.relations.push(relation.clone());
        self.recursive_relations.push(relation);
        self
    }
}

//! Recursive-relation hierarchy index
//!
//! Maintains, per ancestor id, the full transitive descendant set for one
//! recursive relation (e.g. `liesWithin`). The closure is maintained at
//! write time by walking both the old and the new ancestor chain, so
//! recursive lookups are a single bucket read regardless of depth.
//!
//! Reparenting moves the whole subtree: the moved id plus its current
//! descendants leave every ancestor of the old parent and join every
//! ancestor of the new parent. Chain walks carry a visited set; a revisit
//! surfaces LOCUS_HIERARCHY_CYCLE instead of looping.

use std::collections::{HashMap, HashSet};

use crate::model::Resource;

use super::errors::{IndexError, IndexResult};

/// Transitive-closure index over one recursive relation
#[derive(Debug, Clone)]
pub struct HierarchyIndex {
    relation: String,
    /// Child id -> parent id (first relation target)
    parents: HashMap<String, String>,
    /// Parent id -> sorted direct child ids
    children: HashMap<String, Vec<String>>,
    /// Ancestor id -> sorted transitive descendant ids
    descendants: HashMap<String, Vec<String>>,
}

impl HierarchyIndex {
    /// Creates an empty index for the given relation
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            parents: HashMap::new(),
            children: HashMap::new(),
            descendants: HashMap::new(),
        }
    }

    /// Returns the relation this index covers
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the full transitive descendant set of an ancestor.
    ///
    /// Unknown ids yield an empty set.
    pub fn descendants(&self, ancestor: &str) -> Vec<String> {
        self.descendants.get(ancestor).cloned().unwrap_or_default()
    }

    /// Returns the direct children of a parent
    pub fn children(&self, parent: &str) -> Vec<String> {
        self.children.get(parent).cloned().unwrap_or_default()
    }

    /// Checks that applying the document would not create a cycle.
    ///
    /// Read-only; `put` performs the same walks before mutating, so a
    /// passing check guarantees the subsequent `put` succeeds.
    pub fn validate(&self, resource: &Resource) -> IndexResult<()> {
        let new_parent = resource.relation_target(&self.relation);
        self.chain(new_parent, &resource.id)?;
        self.chain(self.parents.get(&resource.id).map(String::as_str), &resource.id)?;
        Ok(())
    }

    /// Applies a document write, moving its subtree between ancestor chains
    /// when the parent changed.
    pub fn put(&mut self, resource: &Resource) -> IndexResult<()> {
        let id = &resource.id;
        let new_parent = resource.relation_target(&self.relation).map(String::from);
        let old_parent = self.parents.get(id).cloned();

        if new_parent == old_parent {
            return Ok(());
        }

        // Walk both chains before touching any bucket; either walk may
        // surface a cycle and must leave the index untouched.
        let new_chain = self.chain(new_parent.as_deref(), id)?;
        let old_chain = self.chain(old_parent.as_deref(), id)?;

        let subtree = self.subtree(id);

        for ancestor in &old_chain {
            self.remove_from_bucket(ancestor, &subtree);
        }
        if let Some(parent) = &old_parent {
            if let Some(kids) = self.children.get_mut(parent) {
                kids.retain(|kid| kid != id);
                if kids.is_empty() {
                    self.children.remove(parent);
                }
            }
        }

        match &new_parent {
            Some(parent) => {
                self.parents.insert(id.clone(), parent.clone());
                let kids = self.children.entry(parent.clone()).or_default();
                if let Err(pos) = kids.binary_search(id) {
                    kids.insert(pos, id.clone());
                }
            }
            None => {
                self.parents.remove(id);
            }
        }
        for ancestor in &new_chain {
            self.add_to_bucket(ancestor, &subtree);
        }

        Ok(())
    }

    /// Detaches an id: its subtree leaves every ancestor's descendant set.
    ///
    /// Edges owned by other documents (the removed id's own children) stay
    /// in place; re-adding the id restores them to the ancestor chain.
    pub fn remove(&mut self, id: &str) {
        let Some(old_parent) = self.parents.remove(id) else {
            return;
        };

        // The index is kept acyclic by put, so this walk cannot fail.
        let old_chain = self
            .chain(Some(old_parent.as_str()), id)
            .unwrap_or_default();
        let subtree = self.subtree(id);

        for ancestor in &old_chain {
            self.remove_from_bucket(ancestor, &subtree);
        }
        if let Some(kids) = self.children.get_mut(&old_parent) {
            kids.retain(|kid| kid != id);
            if kids.is_empty() {
                self.children.remove(&old_parent);
            }
        }
    }

    /// Clears all entries
    pub fn clear(&mut self) {
        self.parents.clear();
        self.children.clear();
        self.descendants.clear();
    }

    /// The id plus its current transitive descendants, sorted
    fn subtree(&self, id: &str) -> Vec<String> {
        let mut subtree = self.descendants(id);
        if let Err(pos) = subtree.binary_search_by(|probe| probe.as_str().cmp(id)) {
            subtree.insert(pos, id.to_string());
        }
        subtree
    }

    /// Walks parent links from `from` to the root.
    ///
    /// Reaching `moving` or any already-visited id means the chain loops
    /// (or would loop once `moving` is attached below `from`).
    fn chain(&self, from: Option<&str>, moving: &str) -> IndexResult<Vec<String>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = from.map(String::from);
        while let Some(c) = current {
            if c == moving || !visited.insert(c.clone()) {
                return Err(IndexError::hierarchy_cycle(&self.relation, moving));
            }
            current = self.parents.get(&c).cloned();
            chain.push(c);
        }
        Ok(chain)
    }

    fn add_to_bucket(&mut self, ancestor: &str, ids: &[String]) {
        let bucket = self.descendants.entry(ancestor.to_string()).or_default();
        for id in ids {
            if let Err(pos) = bucket.binary_search(id) {
                bucket.insert(pos, id.clone());
            }
        }
    }

    fn remove_from_bucket(&mut self, ancestor: &str, ids: &[String]) {
        if let Some(bucket) = self.descendants.get_mut(ancestor) {
            let drop: HashSet<&str> = ids.iter().map(String::as_str).collect();
            bucket.retain(|id| !drop.contains(id.as_str()));
            if bucket.is_empty() {
                self.descendants.remove(ancestor);
            }
        }
    }
}

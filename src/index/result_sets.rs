//! Result-set algebra for compound constraint queries
//!
//! A `ResultSets` accumulates one id group per evaluated constraint: add
//! groups are intersected (AND across constraints), subtract groups are
//! unioned and removed. Within a group all ids are implicitly OR'd, since
//! one group holds every id produced by one constraint evaluation.
//!
//! Built fresh per query, consumed exactly once by `collapse` or `unify`.

use std::collections::{HashMap, HashSet};

use super::item::IndexItem;

/// Whether a combined group constrains positively or negatively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    /// Group participates in the intersection
    Add,
    /// Group's ids are removed from the final result
    Subtract,
}

/// Accumulator of per-constraint id groups plus the shared id -> item map
#[derive(Debug, Default)]
pub struct ResultSets {
    /// One id group per add constraint, in evaluation order
    add_sets: Vec<Vec<String>>,
    /// One id group per subtract constraint, in evaluation order
    subtract_sets: Vec<Vec<String>>,
    /// Shared materialization map; every grouped id has an entry
    map: HashMap<String, IndexItem>,
}

impl ResultSets {
    /// Creates an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no constraint has been combined at all.
    ///
    /// Distinguishes "no constraints" from "constraints matched nothing";
    /// see `contains_only_empty_add_sets` for the latter.
    pub fn is_empty(&self) -> bool {
        self.add_sets.is_empty() && self.subtract_sets.is_empty()
    }

    /// Returns true if at least one add group was combined and every add
    /// group is empty.
    ///
    /// Signals that some constraint definitively excludes all documents,
    /// letting callers short-circuit before evaluating further constraints.
    pub fn contains_only_empty_add_sets(&self) -> bool {
        !self.add_sets.is_empty() && self.add_sets.iter().all(Vec::is_empty)
    }

    /// Records one constraint's contribution as a new group.
    ///
    /// Every item lands in the shared map keyed by id; duplicate items
    /// overwrite the same entry.
    pub fn combine(&mut self, items: Vec<IndexItem>, mode: CombineMode) {
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(item.id.clone());
            self.map.insert(item.id.clone(), item);
        }
        match mode {
            CombineMode::Add => self.add_sets.push(ids),
            CombineMode::Subtract => self.subtract_sets.push(ids),
        }
    }

    /// Intersects the add groups, removes the subtract union, and maps the
    /// surviving ids back through the shared map.
    ///
    /// Output order is the first add group's order, deduplicated. With zero
    /// add groups the result is empty; callers route unconstrained queries
    /// around `collapse` entirely.
    pub fn collapse(self) -> Vec<IndexItem> {
        let Some((first, rest)) = self.add_sets.split_first() else {
            return Vec::new();
        };

        let rest_sets: Vec<HashSet<&str>> = rest
            .iter()
            .map(|group| group.iter().map(String::as_str).collect())
            .collect();
        let subtracted: HashSet<&str> = self
            .subtract_sets
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        for id in first {
            if !seen.insert(id.as_str()) {
                continue;
            }
            if subtracted.contains(id.as_str()) {
                continue;
            }
            if rest_sets.iter().any(|set| !set.contains(id.as_str())) {
                continue;
            }
            if let Some(item) = self.map.get(id) {
                result.push(item.clone());
            }
        }
        result
    }

    /// Unions the add groups in first-seen order.
    ///
    /// Subtract groups are ignored: unify serves non-exclusionary
    /// multi-match queries.
    pub fn unify(self) -> Vec<IndexItem> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        for id in self.add_sets.iter().flatten() {
            if seen.insert(id.as_str()) {
                if let Some(item) = self.map.get(id) {
                    result.push(item.clone());
                }
            }
        }
        result
    }
}

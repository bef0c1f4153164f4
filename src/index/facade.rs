//! Index facade
//!
//! The single entry point documents pass through on write and constraint
//! queries pass through on read. Owns every registered index; no other
//! component mutates index state.
//!
//! Registration is driven by the category registry: each indexable field
//! gets `:match` and `:exist` indexes, each indexable relation gets
//! `:contain` and `:exist`, and each recursive relation additionally gets a
//! hierarchy index. `identifier:match` and `category:match` always exist.

use std::collections::{BTreeMap, HashMap};

use crate::category::CategoryRegistry;
use crate::model::Document;

use super::constraint::{ConstraintIndex, IndexKind, IndexTarget};
use super::errors::{IndexError, IndexResult};
use super::hierarchy::HierarchyIndex;
use super::item::IndexItem;
use super::result_sets::{CombineMode, ResultSets};

/// One resolved constraint clause fed to `find`.
///
/// `values` are OR'd within the clause; clauses AND together unless
/// `subtract` routes the clause into the negative groups.
#[derive(Debug, Clone)]
pub struct ConstraintClause {
    /// Field or relation name
    pub target: String,
    /// Operator deciding which index serves the clause
    pub kind: IndexKind,
    /// Lookup keys, unioned
    pub values: Vec<String>,
    /// Route the clause into the subtract groups
    pub subtract: bool,
    /// Resolve `contain` through the transitive hierarchy closure
    pub recursive: bool,
}

impl ConstraintClause {
    /// Creates a positive, non-recursive clause
    pub fn new(target: impl Into<String>, kind: IndexKind, values: Vec<String>) -> Self {
        Self {
            target: target.into(),
            kind,
            values,
            subtract: false,
            recursive: false,
        }
    }

    /// Marks the clause as negative
    pub fn subtracting(mut self) -> Self {
        self.subtract = true;
        self
    }

    /// Resolves the clause through the hierarchy closure
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }
}

/// Orchestrates all registered indexes
pub struct IndexFacade {
    /// Constraint name (e.g. "liesWithin:contain") -> index
    constraint_indexes: BTreeMap<String, ConstraintIndex>,
    /// Relation name -> hierarchy index
    hierarchy_indexes: BTreeMap<String, HierarchyIndex>,
    /// Id -> projection of every indexed document
    items: HashMap<String, IndexItem>,
}

impl IndexFacade {
    /// Creates a facade with indexes registered from the category registry
    pub fn new(registry: &CategoryRegistry) -> Self {
        let mut constraint_indexes = BTreeMap::new();
        let mut register = |index: ConstraintIndex| {
            constraint_indexes.insert(index.name(), index);
        };

        register(ConstraintIndex::new(
            IndexTarget::Field("identifier".to_string()),
            IndexKind::Match,
        ));
        register(ConstraintIndex::new(
            IndexTarget::Field("category".to_string()),
            IndexKind::Match,
        ));
        for field in registry.indexed_fields() {
            register(ConstraintIndex::new(
                IndexTarget::Field(field.clone()),
                IndexKind::Match,
            ));
            register(ConstraintIndex::new(
                IndexTarget::Field(field),
                IndexKind::Exist,
            ));
        }
        for relation in registry.indexed_relations() {
            register(ConstraintIndex::new(
                IndexTarget::Relation(relation.clone()),
                IndexKind::Contain,
            ));
            register(ConstraintIndex::new(
                IndexTarget::Relation(relation),
                IndexKind::Exist,
            ));
        }

        let hierarchy_indexes = registry
            .recursive_relations()
            .into_iter()
            .map(|relation| (relation.clone(), HierarchyIndex::new(relation)))
            .collect();

        Self {
            constraint_indexes,
            hierarchy_indexes,
            items: HashMap::new(),
        }
    }

    /// Checks a document without mutating any index.
    ///
    /// A passing check guarantees the subsequent `put` succeeds, which keeps
    /// "nothing partially applied" cheap to uphold.
    pub fn check_put(&self, document: &Document) -> IndexResult<()> {
        let resource = &document.resource;
        if resource.id.is_empty() {
            return Err(IndexError::missing_id(resource.identifier.clone()));
        }
        if resource.identifier.is_empty() {
            return Err(IndexError::missing_identifier(resource.id.clone()));
        }
        if resource.category.is_empty() {
            return Err(IndexError::missing_category(resource.id.clone()));
        }
        for hierarchy in self.hierarchy_indexes.values() {
            hierarchy.validate(resource)?;
        }
        Ok(())
    }

    /// Indexes a created or updated document across every registered index.
    ///
    /// Malformed documents and cycle-creating moves are rejected before the
    /// first index mutation.
    pub fn put(&mut self, document: &Document) -> IndexResult<()> {
        self.check_put(document)?;

        let resource = &document.resource;
        self.items
            .insert(resource.id.clone(), IndexItem::from_document(document));
        for index in self.constraint_indexes.values_mut() {
            index.put(resource);
        }
        for hierarchy in self.hierarchy_indexes.values_mut() {
            hierarchy.put(resource)?;
        }
        Ok(())
    }

    /// Removes a document from every registered index
    pub fn remove(&mut self, document: &Document) -> IndexResult<()> {
        if document.resource.id.is_empty() {
            return Err(IndexError::missing_id(document.resource.identifier.clone()));
        }
        self.remove_id(&document.resource.id);
        Ok(())
    }

    /// Removes an id from every registered index
    pub fn remove_id(&mut self, id: &str) {
        self.items.remove(id);
        for index in self.constraint_indexes.values_mut() {
            index.remove(id);
        }
        for hierarchy in self.hierarchy_indexes.values_mut() {
            hierarchy.remove(id);
        }
    }

    /// Resolves constraint clauses to the matching items.
    ///
    /// Each clause contributes one group to a fresh `ResultSets`; clauses
    /// with only subtract groups run against the full item set. An
    /// all-empty add state short-circuits to an empty result.
    pub fn find(&self, clauses: &[ConstraintClause]) -> Vec<IndexItem> {
        let mut rs = ResultSets::new();
        if clauses.iter().all(|clause| clause.subtract) {
            rs.combine(self.all_items(), CombineMode::Add);
        }

        for clause in clauses {
            let mode = if clause.subtract {
                CombineMode::Subtract
            } else {
                CombineMode::Add
            };
            rs.combine(self.resolve_clause(clause), mode);
            if rs.contains_only_empty_add_sets() {
                return Vec::new();
            }
        }
        rs.collapse()
    }

    /// Unions the clause's key lookups into one contribution.
    fn resolve_clause(&self, clause: &ConstraintClause) -> Vec<IndexItem> {
        let mut union = ResultSets::new();
        for value in &clause.values {
            let ids = self.lookup(clause, value);
            union.combine(self.items_for(&ids), CombineMode::Add);
        }
        union.unify()
    }

    /// Single-key lookup against the index serving the clause
    fn lookup(&self, clause: &ConstraintClause, value: &str) -> Vec<String> {
        if clause.recursive && clause.kind == IndexKind::Contain {
            return self
                .hierarchy_indexes
                .get(&clause.target)
                .map(|hierarchy| hierarchy.descendants(value))
                .unwrap_or_default();
        }
        let name = format!("{}:{}", clause.target, clause.kind.as_str());
        self.constraint_indexes
            .get(&name)
            .map(|index| index.get(value))
            .unwrap_or_default()
    }

    fn items_for(&self, ids: &[String]) -> Vec<IndexItem> {
        ids.iter()
            .filter_map(|id| self.items.get(id).cloned())
            .collect()
    }

    /// Every indexed item, ordered by identifier then id
    pub fn all_items(&self) -> Vec<IndexItem> {
        let mut items: Vec<IndexItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| {
            a.identifier
                .cmp(&b.identifier)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    /// Returns the indexed projection of an id
    pub fn get(&self, id: &str) -> Option<&IndexItem> {
        self.items.get(id)
    }

    /// Returns the number of indexed documents
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuilds every index from scratch by replaying the given documents.
    ///
    /// The rebuild happens on a fresh instance which replaces this one only
    /// on success, so a failed reindex leaves the previous state intact.
    pub fn reindex<'a, I>(&mut self, documents: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut fresh = Self {
            constraint_indexes: self
                .constraint_indexes
                .iter()
                .map(|(name, index)| {
                    let mut index = index.clone();
                    index.clear();
                    (name.clone(), index)
                })
                .collect(),
            hierarchy_indexes: self
                .hierarchy_indexes
                .iter()
                .map(|(relation, hierarchy)| {
                    let mut hierarchy = hierarchy.clone();
                    hierarchy.clear();
                    (relation.clone(), hierarchy)
                })
                .collect(),
            items: HashMap::new(),
        };

        let mut count = 0;
        for document in documents {
            fresh
                .put(document)
                .map_err(|e| IndexError::reindex_failed(&e))?;
            count += 1;
        }

        *self = fresh;
        Ok(count)
    }
}

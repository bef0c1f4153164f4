//! Category registry
//!
//! Validated, immutable view over a set of category definitions. Answers
//! subcategory questions and aggregates indexable members across all
//! categories for index registration.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::errors::{CategoryError, CategoryResult};
use super::types::CategoryDef;

/// Immutable category registry built from validated definitions
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    /// Definitions by name
    categories: HashMap<String, CategoryDef>,
    /// Child names by parent name
    children: HashMap<String, Vec<String>>,
}

impl CategoryRegistry {
    /// Builds a registry from definitions.
    ///
    /// Rejects duplicate names, unknown parents and parent cycles.
    pub fn new(defs: Vec<CategoryDef>) -> CategoryResult<Self> {
        let mut categories: HashMap<String, CategoryDef> = HashMap::new();
        for def in defs {
            if categories.contains_key(&def.name) {
                return Err(CategoryError::duplicate(&def.name));
            }
            categories.insert(def.name.clone(), def);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for def in categories.values() {
            if let Some(parent) = &def.parent {
                if !categories.contains_key(parent) {
                    return Err(CategoryError::unknown_parent(&def.name, parent));
                }
                children.entry(parent.clone()).or_default().push(def.name.clone());
            }
        }
        for siblings in children.values_mut() {
            siblings.sort();
        }

        let registry = Self { categories, children };
        registry.check_cycles()?;
        Ok(registry)
    }

    /// Loads a registry from a JSON array of definitions
    pub fn from_json(json: &str) -> CategoryResult<Self> {
        let defs: Vec<CategoryDef> = serde_json::from_str(json)
            .map_err(|e| CategoryError::malformed("<definitions>", e.to_string()))?;
        Self::new(defs)
    }

    /// Walks every parent chain once; a revisit means a cycle.
    fn check_cycles(&self) -> CategoryResult<()> {
        for name in self.categories.keys() {
            let mut visited = HashSet::new();
            let mut current = Some(name.as_str());
            while let Some(c) = current {
                if !visited.insert(c) {
                    return Err(CategoryError::cycle(name));
                }
                current = self
                    .categories
                    .get(c)
                    .and_then(|def| def.parent.as_deref());
            }
        }
        Ok(())
    }

    /// Returns true if the category name is defined
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Returns true if `child` equals `ancestor` or lies below it
    pub fn is_subcategory(&self, child: &str, ancestor: &str) -> bool {
        let mut current = Some(child);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self
                .categories
                .get(c)
                .and_then(|def| def.parent.as_deref());
        }
        false
    }

    /// Returns the category plus all categories below it, sorted.
    ///
    /// Unknown names yield an empty set, never an error.
    pub fn subcategories(&self, name: &str) -> Vec<String> {
        if !self.categories.contains_key(name) {
            return Vec::new();
        }
        let mut result = Vec::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.get(&current) {
                stack.extend(kids.iter().cloned());
            }
            result.push(current);
        }
        result.sort();
        result
    }

    /// All indexable fields across categories, sorted and deduplicated
    pub fn indexed_fields(&self) -> BTreeSet<String> {
        self.categories
            .values()
            .flat_map(|def| def.fields.iter().cloned())
            .collect()
    }

    /// All indexable relations across categories
    pub fn indexed_relations(&self) -> BTreeSet<String> {
        self.categories
            .values()
            .flat_map(|def| def.relations.iter().cloned())
            .collect()
    }

    /// All recursive relations across categories
    pub fn recursive_relations(&self) -> BTreeSet<String> {
        self.categories
            .values()
            .flat_map(|def| def.recursive_relations.iter().cloned())
            .collect()
    }
}

//! Query resolution
//!
//! Translates a structured query into constraint clauses for the index
//! facade, then applies what indexes cannot express directly: free-text
//! filtering, exact-match-first ordering and pagination.
//!
//! Resolution flow (strict order):
//! 1. Parse constraints into clauses
//! 2. Expand the category filter to subcategories, as one more clause
//! 3. Resolve clauses through the index facade (all items if unconstrained)
//! 4. Filter by the free-text term
//! 5. Sort per sort mode (stable)
//! 6. Count, then apply offset and limit

use crate::category::CategoryRegistry;
use crate::index::{ConstraintClause, IndexFacade, IndexItem, IndexKind};

use super::ast::{parse_constraint_name, Query, SortMode};
use super::errors::QueryResult;

/// Items matching a query, counted before pagination
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    /// Matching items in final order, paginated
    pub items: Vec<IndexItem>,
    /// Match count before offset/limit
    pub total_count: usize,
}

/// Resolves structured queries against an index facade
pub struct QueryResolver<'a> {
    facade: &'a IndexFacade,
    registry: &'a CategoryRegistry,
}

impl<'a> QueryResolver<'a> {
    /// Creates a resolver over the given facade and registry
    pub fn new(facade: &'a IndexFacade, registry: &'a CategoryRegistry) -> Self {
        Self { facade, registry }
    }

    /// Resolves a query to its matching items.
    ///
    /// A query with no constraints, no category filter and no term matches
    /// all indexed documents.
    pub fn resolve(&self, query: &Query) -> QueryResult<ResolvedQuery> {
        let clauses = self.clauses(query)?;

        let mut items = if clauses.is_empty() {
            self.facade.all_items()
        } else {
            self.facade.find(&clauses)
        };

        if let Some(term) = query.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let lowered = term.to_lowercase();
            items.retain(|item| item.identifier.to_lowercase().contains(&lowered));
        }

        self.sort(&mut items, query);

        let total_count = items.len();
        let offset = query.offset.unwrap_or(0);
        let mut items = if offset < items.len() {
            items.split_off(offset)
        } else {
            Vec::new()
        };
        if let Some(limit) = query.limit {
            items.truncate(limit);
        }

        Ok(ResolvedQuery { items, total_count })
    }

    /// Builds the clause sequence: parsed constraints plus the expanded
    /// category filter.
    fn clauses(&self, query: &Query) -> QueryResult<Vec<ConstraintClause>> {
        let mut clauses = Vec::with_capacity(query.constraints.len() + 1);
        for (name, value) in &query.constraints {
            let (target, kind) = parse_constraint_name(name)?;
            let mut clause = ConstraintClause::new(target, kind, value.values());
            if value.subtract() {
                clause = clause.subtracting();
            }
            if value.search_recursively() {
                clause = clause.recursive();
            }
            clauses.push(clause);
        }

        if !query.categories.is_empty() {
            // Unknown categories expand to nothing and so match nothing
            let mut expanded: Vec<String> = query
                .categories
                .iter()
                .flat_map(|category| self.registry.subcategories(category))
                .collect();
            expanded.sort();
            expanded.dedup();
            clauses.push(ConstraintClause::new(
                "category",
                IndexKind::Match,
                expanded,
            ));
        }
        Ok(clauses)
    }

    /// Stable sort per sort mode.
    fn sort(&self, items: &mut [IndexItem], query: &Query) {
        match query.sort {
            SortMode::Identifier => {
                items.sort_by(|a, b| a.identifier.cmp(&b.identifier));
            }
            SortMode::ExactMatchFirst => {
                // Exact matches float to the front; resolution order is
                // preserved within both partitions.
                if let Some(term) = query.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    items.sort_by_key(|item| item.identifier != term);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryDef;
    use crate::model::Document;
    use crate::query::DetailedConstraint;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            CategoryDef::new("Trench"),
            CategoryDef::new("Find")
                .with_field("material")
                .with_recursive_relation("liesWithin"),
            CategoryDef::new("Pottery").with_parent("Find"),
        ])
        .unwrap()
    }

    fn facade(registry: &CategoryRegistry) -> IndexFacade {
        let mut facade = IndexFacade::new(registry);
        facade.put(&Document::new("t1", "T01", "Trench")).unwrap();
        facade
            .put(&Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t1"]))
            .unwrap();
        facade
            .put(
                &Document::new("p1", "POT-001", "Pottery")
                    .with_relation("liesWithin", vec!["f1"]),
            )
            .unwrap();
        facade
    }

    fn ids(resolved: &ResolvedQuery) -> Vec<&str> {
        resolved.items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_unconstrained_query_matches_all() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let resolved = resolver.resolve(&Query::new()).unwrap();
        assert_eq!(resolved.total_count, 3);
        assert_eq!(ids(&resolved), vec!["f1", "p1", "t1"]);
    }

    #[test]
    fn test_category_filter_expands_subcategories() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let resolved = resolver
            .resolve(&Query::new().with_category("Find"))
            .unwrap();
        assert_eq!(ids(&resolved), vec!["f1", "p1"]);
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let resolved = resolver
            .resolve(&Query::new().with_category("Bogus"))
            .unwrap();
        assert_eq!(resolved.total_count, 0);
    }

    #[test]
    fn test_recursive_constraint() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let query = Query::new().with_detailed_constraint(
            "liesWithin:contain",
            DetailedConstraint {
                value: crate::query::ConstraintValues::One("t1".to_string()),
                search_recursively: true,
                subtract: false,
            },
        );
        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(ids(&resolved), vec!["f1", "p1"]);
    }

    #[test]
    fn test_free_text_filters_identifiers() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let resolved = resolver.resolve(&Query::new().with_q("pot")).unwrap();
        assert_eq!(ids(&resolved), vec!["p1"]);
    }

    #[test]
    fn test_exact_match_first_is_stable() {
        let registry = registry();
        let mut facade = IndexFacade::new(&registry);
        for (id, identifier) in [("a", "T1-ext"), ("b", "T1"), ("c", "T10")] {
            facade.put(&Document::new(id, identifier, "Trench")).unwrap();
        }
        let resolver = QueryResolver::new(&facade, &registry);

        let query = Query::new()
            .with_q("T1")
            .with_sort(SortMode::ExactMatchFirst);
        let resolved = resolver.resolve(&query).unwrap();
        // "T1" exactly first; the rest keep identifier order from all_items
        assert_eq!(ids(&resolved), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_pagination_counts_before_window() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let resolved = resolver
            .resolve(&Query::new().with_offset(1).with_limit(1))
            .unwrap();
        assert_eq!(resolved.total_count, 3);
        assert_eq!(ids(&resolved), vec!["p1"]);

        let resolved = resolver
            .resolve(&Query::new().with_offset(10))
            .unwrap();
        assert_eq!(resolved.total_count, 3);
        assert!(resolved.items.is_empty());
    }

    #[test]
    fn test_malformed_constraint_rejected() {
        let registry = registry();
        let facade = facade(&registry);
        let resolver = QueryResolver::new(&facade, &registry);

        let result = resolver.resolve(&Query::new().with_constraint("liesWithin", "t1"));
        assert!(result.is_err());
    }
}

//! Hierarchy Recursion Tests
//!
//! Tests for the incremental transitive-closure index:
//! - recursive lookups span arbitrary depth without query-time traversal
//! - reparenting updates both the old and the new ancestor chain
//! - cycles surface as errors instead of looping

use locusdb::category::{CategoryDef, CategoryRegistry};
use locusdb::index::{ConstraintClause, HierarchyIndex, IndexFacade, IndexKind};
use locusdb::model::Document;

// =============================================================================
// Helper Functions
// =============================================================================

fn feature(id: &str, parent: Option<&str>) -> Document {
    let doc = Document::new(id, id.to_uppercase(), "Feature");
    match parent {
        Some(parent) => doc.with_relation("liesWithin", vec![parent]),
        None => doc,
    }
}

fn registry() -> CategoryRegistry {
    CategoryRegistry::new(vec![
        CategoryDef::new("Trench"),
        CategoryDef::new("Feature").with_recursive_relation("liesWithin"),
        CategoryDef::new("Find")
            .with_parent("Feature")
            .with_recursive_relation("liesWithin"),
    ])
    .unwrap()
}

fn recursive_contain(value: &str) -> ConstraintClause {
    ConstraintClause::new("liesWithin", IndexKind::Contain, vec![value.to_string()])
        .recursive()
}

// =============================================================================
// Closure Maintenance Tests
// =============================================================================

/// Deep chains resolve from every ancestor level.
#[test]
fn test_deep_chain_closure() {
    let mut index = HierarchyIndex::new("liesWithin");
    let ids = ["a", "b", "c", "d", "e"];
    for window in ids.windows(2) {
        index
            .put(&feature(window[1], Some(window[0])).resource)
            .unwrap();
    }

    assert_eq!(index.descendants("a"), vec!["b", "c", "d", "e"]);
    assert_eq!(index.descendants("c"), vec!["d", "e"]);
    assert_eq!(index.children("a"), vec!["b"]);
}

/// Siblings accumulate under the shared ancestors.
#[test]
fn test_siblings_share_ancestors() {
    let mut index = HierarchyIndex::new("liesWithin");
    index.put(&feature("s1", Some("t1")).resource).unwrap();
    index.put(&feature("f1", Some("s1")).resource).unwrap();
    index.put(&feature("f2", Some("s1")).resource).unwrap();

    assert_eq!(index.descendants("t1"), vec!["f1", "f2", "s1"]);
    assert_eq!(index.children("s1"), vec!["f1", "f2"]);
}

/// Reparenting moves the subtree out of every old ancestor and into every
/// new one.
#[test]
fn test_reparent_updates_both_chains() {
    let mut index = HierarchyIndex::new("liesWithin");
    index.put(&feature("s1", Some("t1")).resource).unwrap();
    index.put(&feature("f1", Some("s1")).resource).unwrap();
    index.put(&feature("s2", Some("t2")).resource).unwrap();

    index.put(&feature("s1", Some("s2")).resource).unwrap();

    assert!(index.descendants("t1").is_empty());
    assert_eq!(index.descendants("t2"), vec!["f1", "s1", "s2"]);
    assert_eq!(index.descendants("s2"), vec!["f1", "s1"]);
}

/// Moving below a common ancestor keeps the subtree in that ancestor.
#[test]
fn test_move_within_common_ancestor() {
    let mut index = HierarchyIndex::new("liesWithin");
    index.put(&feature("s1", Some("t1")).resource).unwrap();
    index.put(&feature("s2", Some("t1")).resource).unwrap();
    index.put(&feature("f1", Some("s1")).resource).unwrap();

    index.put(&feature("f1", Some("s2")).resource).unwrap();

    assert_eq!(index.descendants("t1"), vec!["f1", "s1", "s2"]);
    assert!(index.descendants("s1").is_empty());
    assert_eq!(index.descendants("s2"), vec!["f1"]);
}

// =============================================================================
// Cycle Detection Tests
// =============================================================================

/// Direct and transitive self-containment is rejected.
#[test]
fn test_cycles_rejected() {
    let mut index = HierarchyIndex::new("liesWithin");
    index.put(&feature("b", Some("a")).resource).unwrap();
    index.put(&feature("c", Some("b")).resource).unwrap();

    // a -> c would close the loop a > b > c > a
    let result = index.put(&feature("a", Some("c")).resource);
    assert_eq!(
        result.unwrap_err().code().code(),
        "LOCUS_HIERARCHY_CYCLE"
    );

    // The failed move left the closure untouched
    assert_eq!(index.descendants("a"), vec!["b", "c"]);
}

// =============================================================================
// End-To-End Recursive Queries
// =============================================================================

/// The recursive contain constraint finds transitive descendants, and a
/// retarget makes the same query return nothing.
#[test]
fn test_recursive_query_follows_retarget() {
    let mut facade = IndexFacade::new(&registry());
    facade.put(&Document::new("t1", "T01", "Trench")).unwrap();
    facade.put(&Document::new("t2", "T02", "Trench")).unwrap();
    facade
        .put(&Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t1"]))
        .unwrap();

    let matches: Vec<String> = facade
        .find(&[recursive_contain("t1")])
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(matches, vec!["f1"]);

    facade
        .put(&Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t2"]))
        .unwrap();

    assert!(facade.find(&[recursive_contain("t1")]).is_empty());
    let moved: Vec<String> = facade
        .find(&[recursive_contain("t2")])
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(moved, vec!["f1"]);
}

/// Non-recursive contain sees only direct targets.
#[test]
fn test_plain_contain_stays_direct() {
    let mut facade = IndexFacade::new(&registry());
    facade
        .put(&feature("s1", Some("t1")))
        .unwrap();
    facade.put(&feature("f1", Some("s1"))).unwrap();

    let direct = ConstraintClause::new(
        "liesWithin",
        IndexKind::Contain,
        vec!["t1".to_string()],
    );
    let direct_ids: Vec<String> = facade
        .find(&[direct])
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(direct_ids, vec!["s1"]);

    let recursive_ids: Vec<String> = facade
        .find(&[recursive_contain("t1")])
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(recursive_ids, vec!["f1", "s1"]);
}

//! Query AST structures
//!
//! Defines the structured query accepted by `find`: an optional free-text
//! term, category filter, named constraints with modifiers, sort mode and
//! pagination.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::index::IndexKind;

use super::errors::{QueryError, QueryResult};

/// One or many lookup values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValues {
    /// A single value
    One(String),
    /// Multiple values, OR'd within the constraint
    Many(Vec<String>),
}

impl ConstraintValues {
    /// Returns the values as a list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ConstraintValues::One(value) => vec![value.clone()],
            ConstraintValues::Many(values) => values.clone(),
        }
    }
}

/// A constraint value with modifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedConstraint {
    /// Lookup value(s)
    pub value: ConstraintValues,
    /// Resolve through the transitive hierarchy closure
    #[serde(default)]
    pub search_recursively: bool,
    /// Reverse the constraint into an exclusion
    #[serde(default)]
    pub subtract: bool,
}

/// The value side of a named constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    /// Plain value(s), no modifiers
    Plain(ConstraintValues),
    /// Value(s) plus modifiers
    Detailed(DetailedConstraint),
}

impl ConstraintValue {
    /// Returns the lookup values
    pub fn values(&self) -> Vec<String> {
        match self {
            ConstraintValue::Plain(values) => values.to_vec(),
            ConstraintValue::Detailed(detailed) => detailed.value.to_vec(),
        }
    }

    /// Returns true if the constraint excludes its matches
    pub fn subtract(&self) -> bool {
        matches!(self, ConstraintValue::Detailed(d) if d.subtract)
    }

    /// Returns true if the constraint resolves recursively
    pub fn search_recursively(&self) -> bool {
        matches!(self, ConstraintValue::Detailed(d) if d.search_recursively)
    }
}

/// Sort modes for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    /// Sort by identifier, ascending
    #[default]
    Identifier,
    /// Exact identifier matches of the free-text term first, then the
    /// resolution order, stable
    ExactMatchFirst,
}

/// A structured query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Free-text term matched against identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Categories to include; each expands to its subcategories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Named constraints, keyed `<target>:<operator>`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, ConstraintValue>,
    /// Maximum number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Number of results to skip before the limit window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Return ids only, without materializing documents
    #[serde(default)]
    pub skip_documents: bool,
    /// Result ordering
    #[serde(default)]
    pub sort: SortMode,
}

impl Query {
    /// Creates an empty query matching all documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text term
    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Adds a category to the filter
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Adds a single-value constraint without modifiers
    pub fn with_constraint(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.insert(
            name.into(),
            ConstraintValue::Plain(ConstraintValues::One(value.into())),
        );
        self
    }

    /// Adds a constraint with modifiers
    pub fn with_detailed_constraint(
        mut self,
        name: impl Into<String>,
        constraint: DetailedConstraint,
    ) -> Self {
        self.constraints
            .insert(name.into(), ConstraintValue::Detailed(constraint));
        self
    }

    /// Sets the limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the sort mode
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Skips document materialization
    pub fn ids_only(mut self) -> Self {
        self.skip_documents = true;
        self
    }
}

/// Splits a constraint name into target and operator.
///
/// Names are of the form `<target>:<operator>`, e.g. "liesWithin:contain".
pub fn parse_constraint_name(name: &str) -> QueryResult<(String, IndexKind)> {
    let mut parts = name.splitn(2, ':');
    let target = parts.next().unwrap_or_default();
    let Some(operator) = parts.next() else {
        return Err(QueryError::MalformedConstraint(name.to_string()));
    };
    if target.is_empty() || operator.is_empty() {
        return Err(QueryError::MalformedConstraint(name.to_string()));
    }
    let kind = IndexKind::parse(operator).ok_or_else(|| QueryError::UnknownOperator {
        name: name.to_string(),
        operator: operator.to_string(),
    })?;
    Ok((target.to_string(), kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name() {
        let (target, kind) = parse_constraint_name("liesWithin:contain").unwrap();
        assert_eq!(target, "liesWithin");
        assert_eq!(kind, IndexKind::Contain);

        assert!(parse_constraint_name("liesWithin").is_err());
        assert!(parse_constraint_name(":contain").is_err());
        assert!(parse_constraint_name("material:like").is_err());
    }

    #[test]
    fn test_constraint_value_json_forms() {
        // Plain string
        let value: ConstraintValue = serde_json::from_str(r#""t1""#).unwrap();
        assert_eq!(value.values(), vec!["t1"]);
        assert!(!value.subtract());

        // List
        let value: ConstraintValue = serde_json::from_str(r#"["t1", "t2"]"#).unwrap();
        assert_eq!(value.values(), vec!["t1", "t2"]);

        // Detailed
        let value: ConstraintValue =
            serde_json::from_str(r#"{"value": "t1", "searchRecursively": true}"#).unwrap();
        assert_eq!(value.values(), vec!["t1"]);
        assert!(value.search_recursively());
        assert!(!value.subtract());
    }

    #[test]
    fn test_query_json() {
        let json = r#"{
            "q": "find",
            "categories": ["Find"],
            "constraints": {
                "liesWithin:contain": {"value": "t1", "searchRecursively": true},
                "material:match": {"value": ["ceramic"], "subtract": true}
            },
            "limit": 10,
            "sort": "exactMatchFirst"
        }"#;

        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.q.as_deref(), Some("find"));
        assert_eq!(query.categories, vec!["Find"]);
        assert_eq!(query.constraints.len(), 2);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.sort, SortMode::ExactMatchFirst);
        assert!(query.constraints["material:match"].subtract());
    }

    #[test]
    fn test_builder() {
        let query = Query::new()
            .with_category("Find")
            .with_constraint("liesWithin:contain", "t1")
            .with_limit(5);

        assert_eq!(query.categories, vec!["Find"]);
        assert_eq!(query.constraints["liesWithin:contain"].values(), vec!["t1"]);
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.sort, SortMode::Identifier);
    }
}

//! Query subsystem for locusdb
//!
//! The structured-query surface over the index facade: AST types, the
//! `<target>:<operator>` constraint grammar and the resolver that turns a
//! query into clause lookups plus residual filtering and sorting.

mod ast;
mod errors;
mod resolver;

pub use ast::{
    parse_constraint_name, ConstraintValue, ConstraintValues, DetailedConstraint, Query, SortMode,
};
pub use errors::{QueryError, QueryResult};
pub use resolver::{QueryResolver, ResolvedQuery};

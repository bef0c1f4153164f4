//! Query error types

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
///
/// Unknown lookup keys are empty results, never errors; only structurally
/// invalid queries are rejected.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Constraint name is not of the form `<target>:<operator>`
    #[error("Malformed constraint name: {0}")]
    MalformedConstraint(String),

    /// Operator suffix is not contain, match or exist
    #[error("Unknown constraint operator '{operator}' in '{name}'")]
    UnknownOperator {
        /// Full constraint name
        name: String,
        /// Offending operator suffix
        operator: String,
    },
}

impl QueryError {
    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedConstraint(_) => "LOCUS_QUERY_MALFORMED_CONSTRAINT",
            Self::UnknownOperator { .. } => "LOCUS_QUERY_UNKNOWN_OPERATOR",
        }
    }
}

//! Datastore error types

use thiserror::Error;

use crate::index::IndexError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Datastore errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists under the id
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Write carried a stale or missing revision
    #[error("Revision conflict for document: {0}")]
    RevisionConflict(String),

    /// Write carried no resource id
    #[error("Document has no resource id")]
    MissingId,

    /// Indexing rejected the write
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl StoreError {
    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "LOCUS_NOT_FOUND",
            Self::RevisionConflict(_) => "LOCUS_REVISION_CONFLICT",
            Self::MissingId => "LOCUS_MISSING_ID",
            Self::Index(e) => e.code().code(),
        }
    }
}

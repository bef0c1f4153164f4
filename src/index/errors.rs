//! Index error types
//!
//! Error codes:
//! - LOCUS_MISSING_ID (REJECT)
//! - LOCUS_MISSING_IDENTIFIER (REJECT)
//! - LOCUS_MISSING_CATEGORY (REJECT)
//! - LOCUS_HIERARCHY_CYCLE (REJECT)
//! - LOCUS_REINDEX_FAILED (FATAL)

use std::fmt;

/// Severity levels for index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Offending write rejected, index state unchanged
    Reject,
    /// Index state could not be rebuilt
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Document carries no resource id
    MissingId,
    /// Document carries no identifier
    MissingIdentifier,
    /// Document carries no category
    MissingCategory,
    /// A recursive-relation chain loops back on itself
    HierarchyCycle,
    /// Full rebuild aborted, previous state retained
    ReindexFailed,
}

impl IndexErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::MissingId => "LOCUS_MISSING_ID",
            IndexErrorCode::MissingIdentifier => "LOCUS_MISSING_IDENTIFIER",
            IndexErrorCode::MissingCategory => "LOCUS_MISSING_CATEGORY",
            IndexErrorCode::HierarchyCycle => "LOCUS_HIERARCHY_CYCLE",
            IndexErrorCode::ReindexFailed => "LOCUS_REINDEX_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            IndexErrorCode::ReindexFailed => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error with offending-document context
#[derive(Debug)]
pub struct IndexError {
    code: IndexErrorCode,
    /// Offending document id, empty when unknown
    id: String,
    /// Offending document identifier, empty when unknown
    identifier: String,
    message: String,
}

impl IndexError {
    /// Create a missing-id error
    pub fn missing_id(identifier: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::MissingId,
            id: String::new(),
            identifier: identifier.into(),
            message: "document has no resource id".to_string(),
        }
    }

    /// Create a missing-identifier error
    pub fn missing_identifier(id: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::MissingIdentifier,
            id: id.into(),
            identifier: String::new(),
            message: "document has no identifier".to_string(),
        }
    }

    /// Create a missing-category error
    pub fn missing_category(id: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::MissingCategory,
            id: id.into(),
            identifier: String::new(),
            message: "document has no category".to_string(),
        }
    }

    /// Create a hierarchy-cycle error
    pub fn hierarchy_cycle(relation: &str, id: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::HierarchyCycle,
            id: id.into(),
            identifier: String::new(),
            message: format!("'{}' chain loops back on itself", relation),
        }
    }

    /// Create a reindex-failed error wrapping the underlying cause
    pub fn reindex_failed(cause: &IndexError) -> Self {
        Self {
            code: IndexErrorCode::ReindexFailed,
            id: cause.id.clone(),
            identifier: cause.identifier.clone(),
            message: format!("rebuild aborted: {}", cause.message),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the offending document id, empty when unknown
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if !self.id.is_empty() {
            write!(f, " [id={}]", self.id)?;
        }
        if !self.identifier.is_empty() {
            write!(f, " [identifier={}]", self.identifier)?;
        }
        Ok(())
    }
}

impl std::error::Error for IndexError {}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

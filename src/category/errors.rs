//! Category error types
//!
//! Error codes:
//! - LOCUS_CATEGORY_MALFORMED (REJECT)
//! - LOCUS_CATEGORY_UNKNOWN_PARENT (REJECT)
//! - LOCUS_CATEGORY_CYCLE (REJECT)
//! - LOCUS_CATEGORY_DUPLICATE (REJECT)

use std::fmt;

/// Category-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryErrorCode {
    /// Definition file could not be parsed
    CategoryMalformed,
    /// Definition names a parent that does not exist
    CategoryUnknownParent,
    /// Parent chain loops back on itself
    CategoryCycle,
    /// Two definitions share a name
    CategoryDuplicate,
}

impl CategoryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CategoryErrorCode::CategoryMalformed => "LOCUS_CATEGORY_MALFORMED",
            CategoryErrorCode::CategoryUnknownParent => "LOCUS_CATEGORY_UNKNOWN_PARENT",
            CategoryErrorCode::CategoryCycle => "LOCUS_CATEGORY_CYCLE",
            CategoryErrorCode::CategoryDuplicate => "LOCUS_CATEGORY_DUPLICATE",
        }
    }
}

impl fmt::Display for CategoryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Category error with offending definition context
#[derive(Debug)]
pub struct CategoryError {
    code: CategoryErrorCode,
    /// Category name the error refers to
    category: String,
    message: String,
}

impl CategoryError {
    /// Create a malformed-definition error
    pub fn malformed(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: CategoryErrorCode::CategoryMalformed,
            category: category.into(),
            message: reason.into(),
        }
    }

    /// Create an unknown-parent error
    pub fn unknown_parent(category: impl Into<String>, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        Self {
            code: CategoryErrorCode::CategoryUnknownParent,
            category: category.into(),
            message: format!("parent '{}' is not defined", parent),
        }
    }

    /// Create a cycle error
    pub fn cycle(category: impl Into<String>) -> Self {
        Self {
            code: CategoryErrorCode::CategoryCycle,
            category: category.into(),
            message: "parent chain loops back on itself".to_string(),
        }
    }

    /// Create a duplicate-definition error
    pub fn duplicate(category: impl Into<String>) -> Self {
        Self {
            code: CategoryErrorCode::CategoryDuplicate,
            category: category.into(),
            message: "category defined more than once".to_string(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CategoryErrorCode {
        self.code
    }

    /// Returns the offending category name
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.code.code(), self.category, self.message)
    }
}

impl std::error::Error for CategoryError {}

/// Result type for category operations
pub type CategoryResult<T> = Result<T, CategoryError>;

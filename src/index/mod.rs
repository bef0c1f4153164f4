//! Secondary indexing subsystem for locusdb
//!
//! Indexes are derived, in-memory-only state over the document collection.
//!
//! # Design Principles
//!
//! - Derived state: indexes mirror the store, never the source of truth
//! - Deterministic: sorted buckets, explicit result order
//! - Incremental: writes apply deltas; the recursive hierarchy closure is
//!   maintained at write time so deep lookups stay a single bucket read
//!
//! # Invariants
//!
//! - Index mutation is synchronous and completes without interleaving for
//!   a given document
//! - Malformed documents are rejected before the first index mutation
//! - Lookups for unknown keys return empty sets, never errors

mod constraint;
mod errors;
mod facade;
mod hierarchy;
mod item;
mod result_sets;

pub use constraint::{ConstraintIndex, IndexKind, IndexTarget, KNOWN_KEY, UNKNOWN_KEY};
pub use errors::{IndexError, IndexErrorCode, IndexResult, Severity};
pub use facade::{ConstraintClause, IndexFacade};
pub use hierarchy::HierarchyIndex;
pub use item::IndexItem;
pub use result_sets::{CombineMode, ResultSets};

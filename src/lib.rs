//! locusdb - A deterministic in-memory indexing and query engine for
//! field-recording documents
//!
//! Documents describing excavation resources (trenches, features, finds,
//! images) are kept in an in-memory store and made queryable through
//! per-field inverted indexes, an incrementally maintained containment
//! hierarchy, and a compound-constraint resolver.

pub mod category;
pub mod datastore;
pub mod index;
pub mod model;
pub mod observability;
pub mod query;

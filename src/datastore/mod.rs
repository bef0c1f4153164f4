//! Datastore subsystem for locusdb
//!
//! The async entry point over the document collection: an in-memory store
//! with revision-stamped writes and a change feed, a single-copy document
//! cache for materialization, and the composition root wiring both to the
//! index facade and the query resolver.

mod cache;
mod datastore;
mod errors;
mod store;

pub use cache::DocumentCache;
pub use datastore::{Datastore, FindResult};
pub use errors::{StoreError, StoreResult};
pub use store::{Change, ChangeType, DocumentStore};

//! Document model for locusdb
//!
//! Documents describe field-recording resources (trenches, features, finds,
//! images) with a fixed envelope plus an open, typed field map.
//!
//! # Design Principles
//!
//! - Closed value variants: no runtime property enumeration, every field
//!   value is one of a known set of shapes
//! - `resource.id` is immutable once assigned and unique across the live
//!   collection
//! - Relations are named, directed, ordered lists of target ids

mod document;
mod value;

pub use document::{Action, Document, Relations, Resource, Revision};
pub use value::FieldValue;

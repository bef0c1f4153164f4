//! Document and resource envelope
//!
//! A document wraps exactly one resource plus creation/modification stamps
//! and the store-assigned revision. The resource envelope has fixed known
//! fields; everything else flattens into the open field map.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value::FieldValue;

/// Named, directed, ordered relation targets (relation name -> target ids)
pub type Relations = BTreeMap<String, Vec<String>>;

/// A user action stamp (who, when)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Acting user name
    pub user: String,
    /// Timestamp of the action
    pub date: DateTime<Utc>,
}

impl Action {
    /// Creates a stamp for the given user at the current time
    pub fn now(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            date: Utc::now(),
        }
    }
}

/// Store-assigned revision marker.
///
/// `seq` increases monotonically per store; `token` changes on every write
/// and is what conflict checks compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Store sequence number at write time
    pub seq: u64,
    /// Opaque write token
    pub token: Uuid,
}

/// The resource payload of a document.
///
/// Fixed fields cover identity and structure; all other recorded fields
/// flatten into the open `fields` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique document id, immutable once assigned
    pub id: String,
    /// Human-readable label, unique by convention
    pub identifier: String,
    /// Category (type tag), e.g. "Trench", "Find"
    pub category: String,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Relation name -> ordered target ids
    #[serde(default, skip_serializing_if = "Relations::is_empty")]
    pub relations: Relations,
    /// Open typed field map (everything not named above)
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Resource {
    /// Returns the ordered targets of a relation, empty if unset
    pub fn relation_targets(&self, relation: &str) -> &[String] {
        self.relations
            .get(relation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the first target of a relation, if any
    pub fn relation_target(&self, relation: &str) -> Option<&str> {
        self.relation_targets(relation).first().map(String::as_str)
    }
}

/// A complete document: resource plus stamps and revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The resource payload
    pub resource: Resource,
    /// Creation stamp, absent on not-yet-saved drafts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Action>,
    /// Modification stamps, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<Action>,
    /// Store-assigned revision, absent before the first put
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
}

impl Document {
    /// Creates a bare document with the given identity
    pub fn new(
        id: impl Into<String>,
        identifier: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            resource: Resource {
                id: id.into(),
                identifier: identifier.into(),
                category: category.into(),
                short_description: None,
                relations: Relations::new(),
                fields: BTreeMap::new(),
            },
            created: None,
            modified: Vec::new(),
            revision: None,
        }
    }

    /// Sets the short description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.resource.short_description = Some(description.into());
        self
    }

    /// Sets a relation's target list
    pub fn with_relation(mut self, relation: impl Into<String>, targets: Vec<&str>) -> Self {
        self.resource.relations.insert(
            relation.into(),
            targets.into_iter().map(String::from).collect(),
        );
        self
    }

    /// Sets an open field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.resource.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the creation stamp
    pub fn with_created(mut self, action: Action) -> Self {
        self.created = Some(action);
        self
    }

    /// Returns the document id
    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

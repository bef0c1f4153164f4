//! Exact-match constraint indexes
//!
//! One `ConstraintIndex` exists per `<target>:<kind>` pair, mapping a key
//! (relation target id, rendered field value, or presence marker) to the
//! sorted set of document ids matching it.
//!
//! Buckets are sorted ascending for deterministic lookups. A reverse map
//! from id to its current keys makes updates remove stale memberships
//! without consulting the old document.

use std::collections::{BTreeMap, HashMap};

use crate::model::{FieldValue, Resource};

/// Presence key for targets that are set and non-empty
pub const KNOWN_KEY: &str = "KNOWN";
/// Presence key for targets that are absent or empty
pub const UNKNOWN_KEY: &str = "UNKNOWN";

/// What a constraint index reads from the resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    /// A resource field (fixed envelope fields included)
    Field(String),
    /// A named relation
    Relation(String),
}

impl IndexTarget {
    /// Returns the field or relation name
    pub fn name(&self) -> &str {
        match self {
            IndexTarget::Field(name) | IndexTarget::Relation(name) => name,
        }
    }
}

/// How keys derive from the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Relation target membership: one key per target id
    Contain,
    /// Exact value match: one key per rendered scalar value
    Match,
    /// Presence: a single KNOWN or UNKNOWN key
    Exist,
}

impl IndexKind {
    /// Returns the operator suffix used in constraint names
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Contain => "contain",
            IndexKind::Match => "match",
            IndexKind::Exist => "exist",
        }
    }

    /// Parses an operator suffix
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contain" => Some(IndexKind::Contain),
            "match" => Some(IndexKind::Match),
            "exist" => Some(IndexKind::Exist),
            _ => None,
        }
    }
}

/// A single inverted index over one target/kind pair
#[derive(Debug, Clone)]
pub struct ConstraintIndex {
    target: IndexTarget,
    kind: IndexKind,
    /// Key -> sorted ascending document ids
    buckets: BTreeMap<String, Vec<String>>,
    /// Document id -> keys it currently occupies
    memberships: HashMap<String, Vec<String>>,
}

impl ConstraintIndex {
    /// Creates an empty index for the given target and kind
    pub fn new(target: IndexTarget, kind: IndexKind) -> Self {
        Self {
            target,
            kind,
            buckets: BTreeMap::new(),
            memberships: HashMap::new(),
        }
    }

    /// Returns the constraint name this index serves, e.g. "liesWithin:contain"
    pub fn name(&self) -> String {
        format!("{}:{}", self.target.name(), self.kind.as_str())
    }

    /// Computes the keys a resource belongs to in this index
    fn keys(&self, resource: &Resource) -> Vec<String> {
        let mut keys = match (&self.target, self.kind) {
            (IndexTarget::Relation(name), IndexKind::Contain) => {
                resource.relation_targets(name).to_vec()
            }
            (IndexTarget::Relation(name), IndexKind::Exist) => {
                vec![presence_key(!resource.relation_targets(name).is_empty())]
            }
            (IndexTarget::Field(name), IndexKind::Match) => match field_value(resource, name) {
                Some(FieldValue::List(values)) => {
                    values.iter().filter_map(render_scalar).collect()
                }
                Some(value) => render_scalar(&value).into_iter().collect(),
                None => Vec::new(),
            },
            (IndexTarget::Field(name), IndexKind::Exist) => {
                let present = field_value(resource, name)
                    .map(|value| !value.is_empty())
                    .unwrap_or(false);
                vec![presence_key(present)]
            }
            // Contain over a field and Match over a relation extract nothing
            _ => Vec::new(),
        };
        keys.sort();
        keys.dedup();
        keys
    }

    /// Applies a document write: adds the id to newly-membered buckets and
    /// removes it from buckets it no longer belongs to.
    pub fn put(&mut self, resource: &Resource) {
        let id = &resource.id;
        let new_keys = self.keys(resource);
        let old_keys = self
            .memberships
            .insert(id.clone(), new_keys.clone())
            .unwrap_or_default();

        for key in &old_keys {
            if new_keys.binary_search(key).is_err() {
                self.remove_from_bucket(key, id);
            }
        }
        for key in &new_keys {
            if old_keys.binary_search(key).is_err() {
                self.add_to_bucket(key, id);
            }
        }
    }

    /// Removes an id from every bucket it occupies
    pub fn remove(&mut self, id: &str) {
        if let Some(keys) = self.memberships.remove(id) {
            for key in keys {
                self.remove_from_bucket(&key, id);
            }
        }
    }

    /// Returns the bucket for an exact key, empty for unknown keys
    pub fn get(&self, key: &str) -> Vec<String> {
        self.buckets.get(key).cloned().unwrap_or_default()
    }

    /// Returns the number of distinct keys
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Clears all entries
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.memberships.clear();
    }

    fn add_to_bucket(&mut self, key: &str, id: &str) {
        let bucket = self.buckets.entry(key.to_string()).or_default();
        if let Err(pos) = bucket.binary_search_by(|probe| probe.as_str().cmp(id)) {
            bucket.insert(pos, id.to_string());
        }
    }

    fn remove_from_bucket(&mut self, key: &str, id: &str) {
        if let Some(bucket) = self.buckets.get_mut(key) {
            if let Ok(pos) = bucket.binary_search_by(|probe| probe.as_str().cmp(id)) {
                bucket.remove(pos);
            }
            if bucket.is_empty() {
                self.buckets.remove(key);
            }
        }
    }
}

fn presence_key(present: bool) -> String {
    let key = if present { KNOWN_KEY } else { UNKNOWN_KEY };
    key.to_string()
}

/// Resolves a field name against the fixed envelope first, then the open map
fn field_value(resource: &Resource, name: &str) -> Option<FieldValue> {
    match name {
        "identifier" => Some(FieldValue::String(resource.identifier.clone())),
        "category" => Some(FieldValue::String(resource.category.clone())),
        "shortDescription" => resource
            .short_description
            .clone()
            .map(FieldValue::String),
        _ => resource.fields.get(name).cloned(),
    }
}

/// Renders a scalar value as an index key; lists and objects render nothing
fn render_scalar(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Bool(b) => Some(b.to_string()),
        FieldValue::Int(i) => Some(i.to_string()),
        FieldValue::Float(f) => Some(f.to_string()),
        FieldValue::String(s) => Some(s.clone()),
        FieldValue::List(_) | FieldValue::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn contain_index() -> ConstraintIndex {
        ConstraintIndex::new(
            IndexTarget::Relation("liesWithin".to_string()),
            IndexKind::Contain,
        )
    }

    #[test]
    fn test_name() {
        assert_eq!(contain_index().name(), "liesWithin:contain");
        let index = ConstraintIndex::new(
            IndexTarget::Field("material".to_string()),
            IndexKind::Exist,
        );
        assert_eq!(index.name(), "material:exist");
    }

    #[test]
    fn test_contain_put_and_get() {
        let mut index = contain_index();
        let doc = Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t1"]);

        index.put(&doc.resource);
        assert_eq!(index.get("t1"), vec!["f1"]);
        assert!(index.get("t2").is_empty());
    }

    #[test]
    fn test_put_then_remove_leaves_no_trace() {
        let mut index = contain_index();
        let doc = Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t1"]);

        index.put(&doc.resource);
        index.remove("f1");

        assert!(index.get("t1").is_empty());
        assert_eq!(index.key_count(), 0);
    }

    #[test]
    fn test_retarget_moves_id_between_buckets() {
        let mut index = contain_index();
        let doc = Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t1"]);
        index.put(&doc.resource);

        let doc = Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t2"]);
        index.put(&doc.resource);

        assert!(index.get("t1").is_empty());
        assert_eq!(index.get("t2"), vec!["f1"]);
    }

    #[test]
    fn test_buckets_sorted_ascending() {
        let mut index = contain_index();
        for id in ["f3", "f1", "f2"] {
            let doc = Document::new(id, id.to_uppercase(), "Find")
                .with_relation("liesWithin", vec!["t1"]);
            index.put(&doc.resource);
        }
        assert_eq!(index.get("t1"), vec!["f1", "f2", "f3"]);
    }

    #[test]
    fn test_match_over_list_field_keys_per_element() {
        let mut index = ConstraintIndex::new(
            IndexTarget::Field("material".to_string()),
            IndexKind::Match,
        );
        let doc = Document::new("f1", "FIND-001", "Find").with_field(
            "material",
            FieldValue::List(vec![FieldValue::from("ceramic"), FieldValue::from("glass")]),
        );

        index.put(&doc.resource);
        assert_eq!(index.get("ceramic"), vec!["f1"]);
        assert_eq!(index.get("glass"), vec!["f1"]);
    }

    #[test]
    fn test_match_over_fixed_envelope_field() {
        let mut index = ConstraintIndex::new(
            IndexTarget::Field("category".to_string()),
            IndexKind::Match,
        );
        let doc = Document::new("f1", "FIND-001", "Find");

        index.put(&doc.resource);
        assert_eq!(index.get("Find"), vec!["f1"]);
    }

    #[test]
    fn test_exist_tracks_presence_and_absence() {
        let mut index = ConstraintIndex::new(
            IndexTarget::Field("material".to_string()),
            IndexKind::Exist,
        );

        let with = Document::new("f1", "FIND-001", "Find").with_field("material", "ceramic");
        let without = Document::new("f2", "FIND-002", "Find");
        index.put(&with.resource);
        index.put(&without.resource);

        assert_eq!(index.get(KNOWN_KEY), vec!["f1"]);
        assert_eq!(index.get(UNKNOWN_KEY), vec!["f2"]);

        // Clearing the field moves the id to the UNKNOWN bucket
        let cleared = Document::new("f1", "FIND-001", "Find");
        index.put(&cleared.resource);
        assert!(index.get(KNOWN_KEY).is_empty());
        assert_eq!(index.get(UNKNOWN_KEY), vec!["f1", "f2"]);
    }

    #[test]
    fn test_relation_exist() {
        let mut index = ConstraintIndex::new(
            IndexTarget::Relation("depicts".to_string()),
            IndexKind::Exist,
        );
        let doc = Document::new("i1", "IMG-001", "Image").with_relation("depicts", vec!["f1"]);
        index.put(&doc.resource);

        assert_eq!(index.get(KNOWN_KEY), vec!["i1"]);
    }

    #[test]
    fn test_put_idempotent() {
        let mut index = contain_index();
        let doc = Document::new("f1", "FIND-001", "Find").with_relation("liesWithin", vec!["t1"]);
        index.put(&doc.resource);
        index.put(&doc.resource);

        assert_eq!(index.get("t1"), vec!["f1"]);
    }
}

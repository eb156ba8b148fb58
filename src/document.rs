//! The local document mirror and its change-tracking ledger.

use crate::error::{Result, StoreError};
use crate::schema::Schema;
use crate::selector::{PathSegment, Selector};
use crate::types::DocumentId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-instance record of fields with unsaved modifications.
///
/// Each entry keeps the field's original value from the moment it first
/// became dirty; the entry is dropped once the field is confirmed persisted.
#[derive(Clone, Debug, Default)]
pub struct ChangeLedger {
    changed: HashMap<String, Value>,
}

impl ChangeLedger {
    /// Mark a field dirty. The first-seen original value wins; re-marking
    /// an already-dirty field keeps the earlier original.
    pub fn record_change(&mut self, field: &str, original: Value) {
        self.changed.entry(field.to_string()).or_insert(original);
    }

    /// Clear the dirty flag for a field. Idempotent if already clean.
    pub fn remove_change(&mut self, field: &str) {
        self.changed.remove(field);
    }

    /// Whether a field has unsaved modifications.
    pub fn is_changed(&self, field: &str) -> bool {
        self.changed.contains_key(field)
    }

    /// The original value of a dirty field, if any.
    pub fn original(&self, field: &str) -> Option<&Value> {
        self.changed.get(field)
    }

    /// Names of all dirty fields.
    pub fn changed_fields(&self) -> impl Iterator<Item = &str> {
        self.changed.keys().map(String::as_str)
    }

    /// Whether no field is dirty.
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty()
    }
}

/// A locally held mirror of one stored document.
///
/// Attributes are keyed by persisted field name. A document is either a
/// root (empty embedding path) or embedded inside a parent's array field,
/// in which case it carries the root's id plus the positional chain down
/// to itself.
#[derive(Clone, Debug)]
pub struct Document {
    id: Option<DocumentId>,
    schema: Arc<Schema>,
    attributes: Map<String, Value>,
    changes: ChangeLedger,
    path: Vec<PathSegment>,
}

impl Document {
    /// Create an unsaved top-level document.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            id: None,
            schema,
            attributes: Map::new(),
            changes: ChangeLedger::default(),
            path: Vec::new(),
        }
    }

    /// Create a mirror of a document embedded at `path` inside the root
    /// document identified by `root_id`.
    pub fn embedded(schema: Arc<Schema>, root_id: DocumentId, path: Vec<PathSegment>) -> Self {
        Self {
            id: Some(root_id),
            schema,
            attributes: Map::new(),
            changes: ChangeLedger::default(),
            path,
        }
    }

    /// Persisted identity (the root document's id for embedded documents).
    pub fn id(&self) -> Option<DocumentId> {
        self.id
    }

    /// Record the identity assigned by the store.
    pub fn mark_persisted(&mut self, id: DocumentId) {
        self.id = Some(id);
    }

    /// The document type's field table.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// All attributes, keyed by persisted field name.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Set a field's value, marking it dirty in the ledger.
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        let db_name = self.schema.database_field_name(field)?.to_string();
        let original = self
            .attributes
            .get(&db_name)
            .cloned()
            .unwrap_or(Value::Null);
        self.changes.record_change(&db_name, original);
        self.attributes.insert(db_name, value);
        Ok(())
    }

    /// Get a field's current local value.
    pub fn get(&self, field: &str) -> Result<Option<&Value>> {
        let db_name = self.schema.database_field_name(field)?;
        Ok(self.attributes.get(db_name))
    }

    /// Get a field's current local value as an array, if it holds one.
    pub fn array(&self, field: &str) -> Result<Option<&Vec<Value>>> {
        let db_name = self.schema.database_field_name(field)?;
        Ok(self.attributes.get(db_name).and_then(Value::as_array))
    }

    /// The change ledger.
    pub fn changes(&self) -> &ChangeLedger {
        &self.changes
    }

    /// Build the selector addressing this instance in the store.
    ///
    /// Fails with [`StoreError::NotPersisted`] for documents that have no
    /// store identity yet.
    pub fn selector(&self) -> Result<Selector> {
        let id = self.id.ok_or(StoreError::NotPersisted)?;
        Ok(Selector::embedded(id, self.path.clone()))
    }

    /// Remove every occurrence of `value` from the local array held in the
    /// persisted field `db_name`, returning how many elements were removed.
    ///
    /// A missing or non-array field removes nothing; the store decides
    /// independently whether anything matches on its side.
    pub(crate) fn pull_value(&mut self, db_name: &str, value: &Value) -> usize {
        match self.attributes.get_mut(db_name) {
            Some(Value::Array(items)) => {
                let before = items.len();
                items.retain(|item| item != value);
                before - items.len()
            }
            _ => 0,
        }
    }

    /// Clear the ledger entry for a persisted field name.
    pub(crate) fn remove_change(&mut self, db_name: &str) {
        self.changes.remove_change(db_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::builder().array("tags").scalar("name").build())
    }

    #[test]
    fn test_set_marks_dirty_with_original() {
        let mut doc = Document::new(schema());
        doc.set("tags", json!(["a", "b"])).unwrap();

        assert!(doc.changes().is_changed("tags"));
        assert_eq!(doc.changes().original("tags"), Some(&Value::Null));

        // Re-setting keeps the first-seen original.
        doc.set("tags", json!(["c"])).unwrap();
        assert_eq!(doc.changes().original("tags"), Some(&Value::Null));
    }

    #[test]
    fn test_pull_value_removes_all_occurrences() {
        let mut doc = Document::new(schema());
        doc.set("tags", json!(["a", "b", "a", "c"])).unwrap();

        let removed = doc.pull_value("tags", &json!("a"));
        assert_eq!(removed, 2);
        assert_eq!(doc.get("tags").unwrap(), Some(&json!(["b", "c"])));
    }

    #[test]
    fn test_pull_value_missing_or_scalar_is_noop() {
        let mut doc = Document::new(schema());
        assert_eq!(doc.pull_value("tags", &json!("a")), 0);

        doc.set("name", json!("solo")).unwrap();
        assert_eq!(doc.pull_value("name", &json!("solo")), 0);
        assert_eq!(doc.get("name").unwrap(), Some(&json!("solo")));
    }

    #[test]
    fn test_remove_change_idempotent() {
        let mut ledger = ChangeLedger::default();
        ledger.record_change("tags", Value::Null);
        ledger.remove_change("tags");
        ledger.remove_change("tags");
        assert!(ledger.is_clean());
    }

    #[test]
    fn test_selector_requires_identity() {
        let doc = Document::new(schema());
        assert!(matches!(doc.selector(), Err(StoreError::NotPersisted)));

        let mut doc = Document::new(schema());
        doc.mark_persisted(DocumentId(9));
        let selector = doc.selector().unwrap();
        assert_eq!(selector.id, DocumentId(9));
        assert!(!selector.is_embedded());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut doc = Document::new(schema());
        assert!(matches!(
            doc.set("ghost", json!(1)),
            Err(StoreError::UnknownField(_))
        ));
    }
}

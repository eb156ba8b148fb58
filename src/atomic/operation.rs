//! The atomic-operation harness and its update-request building blocks.

use crate::document::Document;
use crate::error::Result;
use crate::store::DocumentStore;
use crate::wire::UpdateRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Operation key for single-value array removal.
pub const PULL: &str = "$pull";

/// Operation key for multi-value array removal.
pub const PULL_ALL: &str = "$pullAll";

/// Per-call map of wire field key to the value(s) being removed.
///
/// Created empty by the harness, populated by the caller's closure, and
/// consumed by exactly one update request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingOps {
    ops: Map<String, Value>,
}

impl PendingOps {
    /// Record a mutation for a wire field key.
    pub fn insert(&mut self, wire_key: String, value: Value) {
        self.ops.insert(wire_key, value);
    }

    /// Number of fields touched so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether no field has been touched.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// One wire-level update: `{ "<operator>": { "<field>": <value>, ... } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateDocument {
    operator: String,
    ops: Map<String, Value>,
}

impl UpdateDocument {
    /// Empty update for an operator key.
    pub fn new(operator: impl Into<String>) -> Self {
        Self { operator: operator.into(), ops: Map::new() }
    }

    /// Update carrying a fully populated pending-op map.
    pub fn from_pending(operator: impl Into<String>, pending: PendingOps) -> Self {
        Self { operator: operator.into(), ops: pending.ops }
    }

    /// The operation key, e.g. `$pull`.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Add a field mutation.
    pub fn insert(&mut self, wire_key: String, value: Value) {
        self.ops.insert(wire_key, value);
    }

    /// Iterate the field mutations.
    pub fn ops(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ops.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of field mutations carried.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the update carries no field mutations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Rebuild the update with every field key rewritten.
    pub fn map_keys(self, mut f: impl FnMut(&str) -> String) -> Self {
        let ops = self.ops.into_iter().map(|(k, v)| (f(&k), v)).collect();
        Self { operator: self.operator, ops }
    }

    /// The full wire shape as a JSON value.
    pub fn to_json(&self) -> Value {
        let mut outer = Map::new();
        outer.insert(self.operator.clone(), Value::Object(self.ops.clone()));
        Value::Object(outer)
    }
}

impl Document {
    /// Run one atomic operation against the store.
    ///
    /// Resolves the selector once (failing fast if the document has no
    /// store identity), hands the caller an empty pending-op map to
    /// populate alongside its local mutations, then issues exactly one
    /// update request carrying everything the closure recorded. The
    /// closure's local mutations stand even if the store write fails;
    /// callers reconcile by reloading.
    pub fn prepare_atomic_operation<S, F>(
        &mut self,
        store: &S,
        operator: &'static str,
        f: F,
    ) -> Result<bool>
    where
        S: DocumentStore + ?Sized,
        F: FnOnce(&mut Document, &mut PendingOps) -> Result<()>,
    {
        let selector = self.selector()?;

        let mut pending = PendingOps::default();
        f(self, &mut pending)?;

        let update = selector.positionally(UpdateDocument::from_pending(operator, pending));
        debug!(
            operator,
            id = %selector.id,
            fields = update.len(),
            "issuing atomic update"
        );

        store.update(&UpdateRequest { selector, update })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_document_wire_shape() {
        let mut pending = PendingOps::default();
        pending.insert("tags".to_string(), json!("a"));

        let update = UpdateDocument::from_pending(PULL, pending);
        assert_eq!(update.to_json(), json!({ "$pull": { "tags": "a" } }));
    }

    #[test]
    fn test_empty_update_is_legal() {
        let update = UpdateDocument::new(PULL_ALL);
        assert!(update.is_empty());
        assert_eq!(update.to_json(), json!({ "$pullAll": {} }));
    }

    #[test]
    fn test_map_keys_preserves_operator() {
        let mut update = UpdateDocument::new(PULL);
        update.insert("tags".to_string(), json!("a"));

        let rewritten = update.map_keys(|k| format!("children.0.{k}"));
        assert_eq!(rewritten.operator(), PULL);
        assert_eq!(
            rewritten.to_json(),
            json!({ "$pull": { "children.0.tags": "a" } })
        );
    }
}

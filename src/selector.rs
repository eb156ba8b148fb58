//! Selectors: addressing one document instance in the store.

use crate::atomic::UpdateDocument;
use crate::types::DocumentId;
use serde::{Deserialize, Serialize};

/// One step of an embedding path: an array-valued field on the parent and
/// the index of the embedded document within it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Persisted name of the parent's array field.
    pub field: String,
    /// Index of the embedded document within that array.
    pub index: usize,
}

impl PathSegment {
    pub fn new(field: impl Into<String>, index: usize) -> Self {
        Self { field: field.into(), index }
    }
}

/// Uniquely addresses one document instance: the root document's id plus
/// the positional chain down to the embedded document (empty for roots).
///
/// Resolved once per atomic operation, so the position is stable across
/// every field in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Root document identity.
    pub id: DocumentId,
    /// Embedding path from the root down to the target document.
    pub path: Vec<PathSegment>,
}

impl Selector {
    /// Selector for a top-level document.
    pub fn root(id: DocumentId) -> Self {
        Self { id, path: Vec::new() }
    }

    /// Selector for a document embedded at the given path.
    pub fn embedded(id: DocumentId, path: Vec<PathSegment>) -> Self {
        Self { id, path }
    }

    /// Whether the target is embedded inside a parent document.
    pub fn is_embedded(&self) -> bool {
        !self.path.is_empty()
    }

    /// Rewrite a wire field key into its positional form, e.g. `tags` into
    /// `children.2.tags`. Top-level keys pass through unchanged.
    pub fn positional_key(&self, key: &str) -> String {
        if self.path.is_empty() {
            return key.to_string();
        }
        let mut out = String::new();
        for segment in &self.path {
            out.push_str(&segment.field);
            out.push('.');
            out.push_str(&segment.index.to_string());
            out.push('.');
        }
        out.push_str(key);
        out
    }

    /// Rewrite every field key of an update into positional form.
    ///
    /// Applied exactly once per atomic operation, after the pending-op map
    /// is fully populated.
    pub fn positionally(&self, update: UpdateDocument) -> UpdateDocument {
        if self.path.is_empty() {
            return update;
        }
        update.map_keys(|key| self.positional_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_key_unchanged() {
        let selector = Selector::root(DocumentId(7));
        assert_eq!(selector.positional_key("tags"), "tags");
        assert!(!selector.is_embedded());
    }

    #[test]
    fn test_embedded_key_rewritten() {
        let selector =
            Selector::embedded(DocumentId(7), vec![PathSegment::new("children", 2)]);
        assert_eq!(selector.positional_key("tags"), "children.2.tags");
    }

    #[test]
    fn test_nested_embedding_chain() {
        let selector = Selector::embedded(
            DocumentId(7),
            vec![PathSegment::new("children", 2), PathSegment::new("toys", 0)],
        );
        assert_eq!(selector.positional_key("tags"), "children.2.toys.0.tags");
    }

    #[test]
    fn test_positionally_rewrites_all_keys() {
        let selector =
            Selector::embedded(DocumentId(1), vec![PathSegment::new("children", 3)]);

        let mut update = UpdateDocument::new("$pull");
        update.insert("tags".to_string(), json!("a"));
        update.insert("levels".to_string(), json!(5));

        let rewritten = selector.positionally(update);
        let ops: Vec<_> = rewritten.ops().map(|(k, _)| k.to_string()).collect();
        assert!(ops.contains(&"children.3.tags".to_string()));
        assert!(ops.contains(&"children.3.levels".to_string()));
    }
}

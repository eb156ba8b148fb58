//! The store update-handle and an in-process reference implementation.

use crate::atomic::{UpdateDocument, PULL, PULL_ALL};
use crate::error::{Result, StoreError};
use crate::selector::Selector;
use crate::types::{DocumentId, StoreStats};
use crate::wire::UpdateRequest;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Update-handle exposed by a document store.
///
/// One call is one atomic update: the store finds the document matching the
/// request's selector and applies every field mutation of the update
/// together, or none of them.
pub trait DocumentStore {
    /// Apply one atomic update.
    ///
    /// Returns `Ok(true)` when a document matched the selector and the
    /// update was applied, `Ok(false)` when nothing matched (unknown id or
    /// stale embedding path), and `Err` on constraint failures such as
    /// removal from a non-array persisted field or an unknown operator.
    fn update(&self, request: &UpdateRequest) -> Result<bool>;
}

/// In-process document store holding root documents as JSON objects.
///
/// Intended as the reference implementation of the update-handle contract;
/// a networked store would sit behind the same trait.
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentId, Value>>,
    next_id: AtomicU64,
    update_calls: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            update_calls: AtomicU64::new(0),
        }
    }

    /// Insert a root document, returning its assigned id.
    pub fn insert(&self, attributes: Map<String, Value>) -> DocumentId {
        let id = DocumentId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.documents.write().insert(id, Value::Object(attributes));
        id
    }

    /// Fetch a root document's current persisted state.
    pub fn get(&self, id: DocumentId) -> Option<Value> {
        self.documents.read().get(&id).cloned()
    }

    /// Store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            document_count: self.documents.read().len() as u64,
            update_calls: self.update_calls.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn update(&self, request: &UpdateRequest) -> Result<bool> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);

        let mut documents = self.documents.write();
        let Some(root) = documents.get_mut(&request.selector.id) else {
            debug!(id = %request.selector.id, "update matched no document");
            return Ok(false);
        };

        if !selector_matches(root, &request.selector) {
            debug!(id = %request.selector.id, "embedding path is stale");
            return Ok(false);
        }

        // All-or-nothing per request: mutate a scratch copy, commit only
        // once every field mutation succeeded.
        let mut scratch = root.clone();
        apply_update(&mut scratch, &request.update)?;
        *root = scratch;

        debug!(
            id = %request.selector.id,
            operator = request.update.operator(),
            fields = request.update.len(),
            "applied atomic update"
        );
        Ok(true)
    }
}

/// Verify the selector's embedding path resolves to an embedded document.
fn selector_matches(root: &Value, selector: &Selector) -> bool {
    let mut current = root;
    for segment in &selector.path {
        match current.get(&segment.field).and_then(|v| v.get(segment.index)) {
            Some(next) => current = next,
            None => return false,
        }
    }
    current.is_object()
}

/// Apply every field mutation of an update to a root document value.
fn apply_update(root: &mut Value, update: &UpdateDocument) -> Result<()> {
    match update.operator() {
        PULL => {
            for (path, value) in update.ops() {
                pull_at_path(root, path, value)?;
            }
            Ok(())
        }
        PULL_ALL => {
            for (path, operand) in update.ops() {
                let Value::Array(values) = operand else {
                    return Err(StoreError::Corruption(format!(
                        "$pullAll operand for {path} is not an array"
                    )));
                };
                for value in values {
                    pull_at_path(root, path, value)?;
                }
            }
            Ok(())
        }
        other => Err(StoreError::UnknownOperator(other.to_string())),
    }
}

/// Remove all occurrences of `value` from the array at a dotted positional
/// path (`children.2.tags`). A numeric segment indexes into an array.
///
/// A path or field missing from the document removes nothing; an existing
/// non-array value at the final field is a constraint failure.
fn pull_at_path(root: &mut Value, path: &str, value: &Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();

    let mut current = root;
    for segment in &segments[..segments.len() - 1] {
        let next = match current {
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get_mut(idx)),
            Value::Object(map) => map.get_mut(*segment),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return Ok(()),
        }
    }

    let field = segments[segments.len() - 1];
    let Value::Object(map) = current else {
        return Ok(());
    };
    match map.get_mut(field) {
        None => Ok(()),
        Some(Value::Array(items)) => {
            items.retain(|item| item != value);
            Ok(())
        }
        Some(_) => Err(StoreError::NotAnArray { field: field.to_string() }),
    }
}

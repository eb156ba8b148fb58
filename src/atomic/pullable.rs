//! Array-element removal operations.

use super::operation::{PULL, PULL_ALL};
use crate::document::Document;
use crate::error::Result;
use crate::schema::atomic_attribute_name;
use crate::store::DocumentStore;
use serde_json::Value;
use tracing::trace;

/// Capability interface for `$pull` / `$pullAll` atomic operations.
///
/// Implemented by [`Document`]; both operations mutate the local mirror
/// optimistically, clear the change ledger for every touched field, and
/// issue a single batched update request to the store.
pub trait Pullable {
    /// Pull single values from the provided array fields.
    ///
    /// If duplicate values are present they are all pulled; a value absent
    /// from the local array is a local no-op, but the store request is
    /// still issued.
    ///
    /// ```ignore
    /// document.pull(&store, &[("names", json!("Jeff")), ("levels", json!(5))])?;
    /// ```
    fn pull<S>(&mut self, store: &S, pulls: &[(&str, Value)]) -> Result<bool>
    where
        S: DocumentStore + ?Sized;

    /// Pull multiple values from the provided array fields.
    ///
    /// Every listed value has all of its occurrences removed. An empty
    /// list is legal and produces an empty removal list on the wire.
    ///
    /// ```ignore
    /// document.pull_all(&store, &[("names", vec![json!("Jeff"), json!("Bob")])])?;
    /// ```
    fn pull_all<S>(&mut self, store: &S, pulls: &[(&str, Vec<Value>)]) -> Result<bool>
    where
        S: DocumentStore + ?Sized;
}

impl Pullable for Document {
    fn pull<S>(&mut self, store: &S, pulls: &[(&str, Value)]) -> Result<bool>
    where
        S: DocumentStore + ?Sized,
    {
        self.prepare_atomic_operation(store, PULL, |doc, ops| {
            for (field, value) in pulls {
                let normalized = doc.schema().database_field_name(field)?.to_string();
                let removed = doc.pull_value(&normalized, value);
                trace!(field = %normalized, removed, "pulled value locally");
                doc.remove_change(&normalized);
                // The scalar being removed goes on the wire, never the
                // resulting array.
                ops.insert(atomic_attribute_name(&normalized)?, value.clone());
            }
            Ok(())
        })
    }

    fn pull_all<S>(&mut self, store: &S, pulls: &[(&str, Vec<Value>)]) -> Result<bool>
    where
        S: DocumentStore + ?Sized,
    {
        self.prepare_atomic_operation(store, PULL_ALL, |doc, ops| {
            for (field, values) in pulls {
                let normalized = doc.schema().database_field_name(field)?.to_string();
                let mut removed = 0;
                for value in values {
                    removed += doc.pull_value(&normalized, value);
                }
                trace!(field = %normalized, removed, "pulled values locally");
                doc.remove_change(&normalized);
                // The supplied list goes on the wire as given.
                ops.insert(
                    atomic_attribute_name(&normalized)?,
                    Value::Array(values.clone()),
                );
            }
            Ok(())
        })
    }
}

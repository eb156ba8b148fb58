//! # Document Store
//!
//! An atomic array-removal persistence layer: documents are mirrored
//! locally, mutated optimistically, and reconciled with a document store
//! through single-request atomic updates.
//!
//! ## Core Concepts
//!
//! - **Documents**: local mirrors of stored entities, with change-tracked
//!   fields and optional embedding inside a parent's array field
//! - **Atomic operations**: all field mutations of one call batched into
//!   one wire-level update request
//! - **Positional addressing**: embedded documents addressed by index
//!   chain (`children.2.tags`) rather than by top-level key
//! - **Change ledger**: per-instance record of fields with unsaved
//!   modifications, cleared exactly for what was persisted
//!
//! ## Example
//!
//! ```ignore
//! use docstore::{Document, MemoryStore, Pullable, Schema};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let schema = Arc::new(Schema::builder().array("tags").build());
//! let store = MemoryStore::new();
//!
//! let mut doc = Document::new(schema);
//! doc.set("tags", json!(["red", "blue", "red"]))?;
//! let id = store.insert(doc.attributes().clone());
//! doc.mark_persisted(id);
//!
//! // One store write; all occurrences of "red" removed locally and remotely.
//! doc.pull(&store, &[("tags", json!("red"))])?;
//! ```

pub mod atomic;
pub mod document;
pub mod error;
pub mod schema;
pub mod selector;
pub mod store;
pub mod types;
pub mod wire;

// Re-exports
pub use atomic::{PendingOps, Pullable, UpdateDocument, PULL, PULL_ALL};
pub use document::{ChangeLedger, Document};
pub use error::{Result, StoreError};
pub use schema::{atomic_attribute_name, FieldDescriptor, FieldKind, Schema, SchemaBuilder};
pub use selector::{PathSegment, Selector};
pub use store::{DocumentStore, MemoryStore};
pub use types::{DocumentId, StoreStats};
pub use wire::UpdateRequest;

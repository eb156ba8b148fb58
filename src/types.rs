//! Core types shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a persisted document (assigned by the store).
///
/// Embedded documents carry the identifier of their root document; the
/// embedding path distinguishes them within it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default)]
pub struct StoreStats {
    /// Number of root documents currently held.
    pub document_count: u64,
    /// Total update requests received, including those that matched nothing.
    pub update_calls: u64,
}

//! Atomic document mutations.
//!
//! One atomic operation is one wire-level update request: however many
//! fields a caller touches, they are batched into a single request that the
//! store applies together.

pub mod operation;
pub mod pullable;

pub use operation::{PendingOps, UpdateDocument, PULL, PULL_ALL};
pub use pullable::Pullable;

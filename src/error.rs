//! Error types for document persistence.

use thiserror::Error;

/// Main error type for document operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document has not been persisted")]
    NotPersisted,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid field name for wire format: {0}")]
    InvalidFieldName(String),

    #[error("Unknown atomic operator: {0}")]
    UnknownOperator(String),

    #[error("Field is not an array: {field}")]
    NotAnArray { field: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Checksum mismatch: expected {expected}, got {got}")]
    ChecksumMismatch { expected: u32, got: u32 },

    #[error("Corruption detected: {0}")]
    Corruption(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for StoreError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for StoreError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        StoreError::Deserialization(e.to_string())
    }
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, StoreError>;

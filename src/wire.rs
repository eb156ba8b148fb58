//! Wire envelope for update requests.
//!
//! Transport is out of scope; this module only defines the framed encoding
//! a transport would carry: a length-prefixed MessagePack body followed by
//! a CRC32 checksum.

use crate::atomic::UpdateDocument;
use crate::error::{Result, StoreError};
use crate::selector::Selector;
use serde::{Deserialize, Serialize};

/// Maximum accepted request body (sanity check when decoding).
const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

/// One atomic update request: which document, and what to do to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Addresses the document instance to update.
    pub selector: Selector,
    /// The positionally rewritten update to apply.
    pub update: UpdateDocument,
}

impl UpdateRequest {
    /// Encode as a framed buffer: `len (u32 LE) | body | crc32 (u32 LE)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = rmp_serde::to_vec(self)?;

        let mut out = Vec::with_capacity(body.len() + 8);
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
        Ok(out)
    }

    /// Decode a framed buffer, verifying length and checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(StoreError::Corruption("request frame too short".into()));
        }

        let len = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
        if len > MAX_REQUEST_BYTES {
            return Err(StoreError::Corruption("request body too large".into()));
        }
        if bytes.len() != len + 8 {
            return Err(StoreError::Corruption(format!(
                "request frame length mismatch: header says {}, frame holds {}",
                len,
                bytes.len().saturating_sub(8)
            )));
        }

        let body = &bytes[4..4 + len];
        let stored = u32::from_le_bytes(bytes[4 + len..].try_into().unwrap());
        let computed = crc32fast::hash(body);
        if stored != computed {
            return Err(StoreError::ChecksumMismatch { expected: stored, got: computed });
        }

        Ok(rmp_serde::from_slice(body)?)
    }
}

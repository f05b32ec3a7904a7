//! Opaque pagination cursors
//!
//! A cursor encodes a (collection, key) pair and nothing else. It carries no
//! ordering field value: the active sort value is re-resolved live from the
//! item the cursor references, so cursors stay valid when field values change
//! between requests, and stay stable across releases.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{PaginationError, Result};

/// Stable unique orderable key of an item within its collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ItemKey {
    fn from(key: i64) -> Self {
        Self::Int(key)
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self::Text(key.to_owned())
    }
}

impl From<String> for ItemKey {
    fn from(key: String) -> Self {
        Self::Text(key)
    }
}

#[derive(Serialize, Deserialize)]
struct CursorPayload {
    c: String,
    k: ItemKey,
}

/// Cursor encoding/decoding
pub struct CursorCodec;

impl CursorCodec {
    /// Encode a (collection, key) pair as an opaque base64 token.
    pub fn encode(collection: &str, key: &ItemKey) -> Result<String> {
        let payload = CursorPayload {
            c: collection.to_owned(),
            k: key.clone(),
        };
        let json = serde_json::to_string(&payload)
            .map_err(|e| PaginationError::InvalidCursor(e.to_string()))?;
        Ok(BASE64.encode(json.as_bytes()))
    }

    /// Decode an opaque token back into its (collection, key) pair.
    pub fn decode(token: &str) -> Result<(String, ItemKey)> {
        let bytes = BASE64
            .decode(token.as_bytes())
            .map_err(|e| PaginationError::InvalidCursor(e.to_string()))?;
        let payload: CursorPayload = serde_json::from_slice(&bytes)
            .map_err(|e| PaginationError::InvalidCursor(e.to_string()))?;
        Ok((payload.c, payload.k))
    }
}

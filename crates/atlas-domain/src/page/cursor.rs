//! Opaque resumable cursors.
//!
//! A cursor packs the anchor record's id, the ordered sort-key fields, the
//! anchor's values for those fields, and the sort direction into a
//! transport-safe token (JSON + URL-safe base64, no padding). The token is
//! opaque to clients; the only external contract is the round-trip law
//! `decode(encode(c)) == c`.

use std::cmp::Ordering;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

use super::order::SortDirection;

/// The ordered value domain for sort keys.
///
/// `Null` sorts before every other value; integers sort before text. This
/// gives the in-memory comparison a total order, which is all the engine
/// relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortValue {
    Null,
    Int(i64),
    Text(String),
}

impl SortValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SortValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::Int(_) => 1,
            SortValue::Text(_) => 2,
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Option<i64>> for SortValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SortValue::Null, SortValue::Int)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

/// The decoded cursor payload: a resume position in a compound-key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Unique key of the anchor record (the tiebreaker).
    pub id: i64,
    /// Sort-key field names, most significant first, id excluded.
    pub order_fields: Vec<String>,
    /// The anchor record's values for `order_fields`, parallel by index.
    pub order_values: Vec<SortValue>,
    /// Direction of the sort the cursor was minted under.
    pub direction: SortDirection,
}

/// Encodes a cursor payload into an opaque token.
pub fn encode_cursor(cursor: &Cursor) -> String {
    // Serialization of the payload struct cannot fail.
    let json = serde_json::to_vec(cursor).expect("cursor serialization");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes a token back into a cursor payload.
///
/// Any structural or syntactic failure yields [`DomainError::InvalidCursor`];
/// this function never panics on malformed input. Callers decide whether an
/// invalid anchor degrades to "no anchor" (the page engine's policy) or is
/// rejected outright.
pub fn decode_cursor(token: &str) -> DomainResult<Cursor> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| DomainError::InvalidCursor {
            message: format!("token is not valid base64: {e}"),
        })?;
    let cursor: Cursor =
        serde_json::from_slice(&bytes).map_err(|e| DomainError::InvalidCursor {
            message: format!("token payload is not a cursor: {e}"),
        })?;
    if cursor.order_fields.len() != cursor.order_values.len() {
        return Err(DomainError::InvalidCursor {
            message: "order fields and values differ in length".to_string(),
        });
    }
    Ok(cursor)
}

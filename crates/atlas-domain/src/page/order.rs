//! Compound sort orders.
//!
//! Every order is terminated by the record id so that the resulting total
//! order is deterministic even when earlier fields tie.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::cursor::SortValue;
use super::engine::PageItem;

/// The unique tiebreaker field appended to every compound order.
pub const ID_FIELD: &str = "id";

/// Sort direction applied uniformly across the compound key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Parses the wire tokens `ASC`/`DESC` (case-insensitive).
    /// Unrecognized input defaults to ascending.
    pub fn parse(token: &str) -> Self {
        if token.eq_ignore_ascii_case("DESC") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

/// A compound sort order: named fields in precedence order, id last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    fields: Vec<String>,
    pub direction: SortDirection,
}

impl OrderSpec {
    /// Builds the common two-key order: one primary field plus the id
    /// tiebreaker.
    pub fn new(primary: impl Into<String>, direction: SortDirection) -> Self {
        Self::with_fields(vec![primary.into()], direction)
    }

    /// Builds an n-ary order. The id tiebreaker is appended if absent.
    pub fn with_fields(mut fields: Vec<String>, direction: SortDirection) -> Self {
        if fields.last().map(String::as_str) != Some(ID_FIELD) {
            fields.push(ID_FIELD.to_string());
        }
        Self { fields, direction }
    }

    /// All key fields in precedence order, id included.
    pub fn key_fields(&self) -> &[String] {
        &self.fields
    }

    /// The key fields excluding the id tiebreaker; these are what cursors
    /// carry as anchor values.
    pub fn value_fields(&self) -> &[String] {
        &self.fields[..self.fields.len() - 1]
    }

    /// The same key fields with the direction flipped. Backward pagination
    /// fetches in this order.
    pub fn reversed(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            direction: self.direction.reversed(),
        }
    }

    /// Compares two items under this order, direction applied.
    pub fn compare_items<T: PageItem>(&self, a: &T, b: &T) -> Ordering {
        let mut ord = Ordering::Equal;
        for field in &self.fields {
            ord = a.sort_value(field).cmp(&b.sort_value(field));
            if ord != Ordering::Equal {
                break;
            }
        }
        if ord == Ordering::Equal {
            ord = a.record_id().cmp(&b.record_id());
        }
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// Extracts an item's anchor values for cursor encoding, one per
    /// non-id key field.
    pub fn anchor_values<T: PageItem>(&self, item: &T) -> Vec<SortValue> {
        self.value_fields()
            .iter()
            .map(|f| item.sort_value(f))
            .collect()
    }
}

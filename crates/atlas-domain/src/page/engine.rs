//! The pagination engine.
//!
//! Given a base filter, a compound order and a forward or backward window
//! request, the engine returns exactly the requested window plus navigation
//! metadata. Each invocation is a pure function of its inputs; no state is
//! carried between pages.
//!
//! # Resume predicates
//!
//! An anchor cursor is translated into a predicate selecting records
//! strictly after (or before) the anchor in the lexicographic order over the
//! compound key. For the common two-key order (primary `p`, tiebreaker `id`)
//! the forward predicate is `p > anchor.p OR (p == anchor.p AND id >
//! anchor.id)`; the composition generalizes to any number of key fields.
//! When the anchor's primary value is null the comparison falls back to the
//! id alone, since nulls are not meaningfully ordered by the stores the
//! engine targets.
//!
//! # Overfetch
//!
//! The engine fetches one record more than the window size to learn whether
//! the result set continues past the window, then trims the extra before
//! deriving boundary cursors. The independent total count always reflects
//! the base filter, never the resume predicate.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::DomainResult;

use super::cursor::{decode_cursor, encode_cursor, Cursor, SortValue};
use super::order::{OrderSpec, SortDirection};

/// Window size used when the request names neither `first` nor `last`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A record that can participate in compound-key pagination.
pub trait PageItem {
    /// The record's unique key, always the final tiebreaker.
    fn record_id(&self) -> i64;

    /// The record's value for a named sort field. Unknown fields yield
    /// [`SortValue::Null`].
    fn sort_value(&self, field: &str) -> SortValue;
}

/// Read-only record source consumed by the engine.
///
/// Implementations fetch at most `limit` records matching the filter and the
/// resume predicate, sorted by the given order. The engine never performs
/// offset-based fetching.
#[async_trait]
pub trait RecordSource: Send + Sync {
    type Record: PageItem + Send + Sync;
    type Filter: Send + Sync;

    async fn find_page(
        &self,
        filter: &Self::Filter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> DomainResult<Vec<Self::Record>>;

    /// Unpaginated count of the whole filtered set.
    async fn count(&self, filter: &Self::Filter) -> DomainResult<u64>;
}

/// Which side of the anchor a resume predicate selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundOp {
    After,
    Before,
}

/// The filter condition derived from a cursor: selects records strictly
/// after (or before) the anchor in the compound sort order.
#[derive(Debug, Clone)]
pub struct ResumePredicate {
    fields: Vec<String>,
    anchor_values: Vec<SortValue>,
    anchor_id: i64,
    direction: SortDirection,
    op: BoundOp,
}

impl ResumePredicate {
    fn new(cursor: &Cursor, direction: SortDirection, op: BoundOp) -> Self {
        Self {
            fields: cursor.order_fields.clone(),
            anchor_values: cursor.order_values.clone(),
            anchor_id: cursor.id,
            direction,
            op,
        }
    }

    /// Selects records strictly after the anchor under `direction`.
    pub fn after(cursor: &Cursor, direction: SortDirection) -> Self {
        Self::new(cursor, direction, BoundOp::After)
    }

    /// Selects records strictly before the anchor under `direction`.
    pub fn before(cursor: &Cursor, direction: SortDirection) -> Self {
        Self::new(cursor, direction, BoundOp::Before)
    }

    /// Tests a candidate record against the predicate.
    ///
    /// Composes the lexicographic OR/AND pattern over the full ordered field
    /// list: the first field that differs from the anchor decides; total
    /// ties fall through to the id. A null primary anchor value collapses
    /// the comparison to the id alone.
    pub fn matches<T: PageItem>(&self, item: &T) -> bool {
        let id_only = self.anchor_values.first().map_or(true, SortValue::is_null);

        let mut ord = Ordering::Equal;
        if !id_only {
            for (field, anchor) in self.fields.iter().zip(&self.anchor_values) {
                ord = item.sort_value(field).cmp(anchor);
                if ord != Ordering::Equal {
                    break;
                }
            }
        }
        if ord == Ordering::Equal {
            ord = item.record_id().cmp(&self.anchor_id);
        }
        let ord = match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        match self.op {
            BoundOp::After => ord == Ordering::Greater,
            BoundOp::Before => ord == Ordering::Less,
        }
    }
}

/// A forward (`first`/`after`) or backward (`last`/`before`) window request.
///
/// When both `first` and `last` are supplied, `first` takes precedence. A
/// `before` token without `last` is ignored: backward mode is entered only
/// when `last` is present and `first` is not.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub first: Option<u32>,
    pub after: Option<String>,
    pub last: Option<u32>,
    pub before: Option<String>,
}

impl PageRequest {
    /// Forward window of `first` records.
    pub fn forward(first: u32, after: Option<String>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Self::default()
        }
    }

    /// Backward window of `last` records.
    pub fn backward(last: u32, before: Option<String>) -> Self {
        Self {
            last: Some(last),
            before,
            ..Self::default()
        }
    }

    fn is_forward(&self) -> bool {
        self.first.is_some() || self.last.is_none()
    }

    fn window_size(&self) -> usize {
        self.first
            .or(self.last)
            .unwrap_or(DEFAULT_PAGE_SIZE) as usize
    }
}

/// Navigation metadata for a returned window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether records exist beyond the window in the forward direction.
    pub has_next: bool,
    /// Whether records exist behind the window.
    pub has_previous: bool,
    /// Cursor of the first item in the returned window.
    pub start_cursor: Option<String>,
    /// Cursor of the last item in the returned window.
    pub end_cursor: Option<String>,
    /// Size of the whole filtered set, independent of windowing.
    pub total_count: u64,
}

/// One page of records plus navigation metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// The pagination engine, generic over its record source.
pub struct PageEngine<R: RecordSource> {
    source: Arc<R>,
}

impl<R: RecordSource> PageEngine<R> {
    pub fn new(source: Arc<R>) -> Self {
        Self { source }
    }

    /// Resolves one window of the filtered, sorted result set.
    ///
    /// An invalid or mismatched anchor token degrades to "no anchor" (the
    /// start of the ordered set) with a structured warning, rather than
    /// failing the request.
    pub async fn resolve_page(
        &self,
        filter: &R::Filter,
        order: &OrderSpec,
        window: &PageRequest,
    ) -> DomainResult<Page<R::Record>> {
        let take = window.window_size();

        let (items, has_next, has_previous) = if window.is_forward() {
            let resume = window
                .after
                .as_deref()
                .and_then(|token| resolve_anchor(token, order))
                .map(|c| ResumePredicate::after(&c, order.direction));

            let mut items = self
                .source
                .find_page(filter, resume.as_ref(), order, take + 1)
                .await?;
            let has_next = items.len() > take;
            if has_next {
                items.truncate(take);
            }
            // An anchored forward page always has something before it.
            (items, has_next, resume.is_some())
        } else {
            let resume = window
                .before
                .as_deref()
                .and_then(|token| resolve_anchor(token, order))
                .map(|c| ResumePredicate::before(&c, order.direction));

            // Fetch in reverse order, detect overflow, then restore the
            // ascending presentation order.
            let mut items = self
                .source
                .find_page(filter, resume.as_ref(), &order.reversed(), take + 1)
                .await?;
            let has_previous = items.len() > take;
            if has_previous {
                items.truncate(take);
            }
            items.reverse();
            (items, resume.is_some(), has_previous)
        };

        let total_count = self.source.count(filter).await?;

        let start_cursor = items.first().map(|item| item_cursor(item, order));
        let end_cursor = items.last().map(|item| item_cursor(item, order));

        Ok(Page {
            items,
            info: PageInfo {
                has_next,
                has_previous,
                start_cursor,
                end_cursor,
                total_count,
            },
        })
    }
}

/// Decodes an anchor token, discarding it when undecodable or minted under a
/// different compound order than the current query's.
fn resolve_anchor(token: &str, order: &OrderSpec) -> Option<Cursor> {
    match decode_cursor(token) {
        Ok(cursor) => {
            if cursor.order_fields != order.value_fields() {
                warn!(
                    cursor_fields = ?cursor.order_fields,
                    order_fields = ?order.value_fields(),
                    "cursor order fields do not match query order, ignoring anchor"
                );
                return None;
            }
            Some(cursor)
        }
        Err(err) => {
            warn!(error = %err, "invalid cursor token, starting from first page");
            None
        }
    }
}

/// Mints the boundary cursor for one item of the returned window.
fn item_cursor<T: PageItem>(item: &T, order: &OrderSpec) -> String {
    encode_cursor(&Cursor {
        id: item.record_id(),
        order_fields: order.value_fields().to_vec(),
        order_values: order.anchor_values(item),
        direction: order.direction,
    })
}

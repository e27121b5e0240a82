//! Cursor-based compound-key pagination.
//!
//! The engine pages forward and backward through filtered, sorted result
//! sets without numeric offsets. Positions are carried in opaque, self
//! contained cursor tokens; no pagination state is held server side.

pub mod cursor;
pub mod engine;
pub mod order;

#[cfg(test)]
mod tests;

pub use cursor::{decode_cursor, encode_cursor, Cursor, SortValue};
pub use engine::{
    Page, PageEngine, PageInfo, PageItem, PageRequest, RecordSource, ResumePredicate,
    DEFAULT_PAGE_SIZE,
};
pub use order::{OrderSpec, SortDirection};

//! atlas-domain: Core catalog domain logic
//!
//! This crate contains the core logic of the Atlas catalog service:
//! - Hierarchical domain-access resolution (grants expanded to descendants)
//! - Cursor-based compound-key pagination
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                atlas-domain                  │
//! ├─────────────────────────────────────────────┤
//! │  access/  - Grant expansion & enforcement   │
//! │  page/    - Cursor pagination engine        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The crate performs no I/O of its own. Collaborators are injected through
//! the [`access::DomainGraphReader`] and [`page::RecordSource`] traits at
//! construction time.

pub mod access;
pub mod error;
pub mod page;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};

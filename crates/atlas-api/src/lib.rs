//! atlas-api: HTTP API layer
//!
//! This crate provides the thin surface around the atlas-domain core:
//! - HTTP REST endpoints via Axum
//! - Adapters bridging storage to the domain traits
//! - Query-parameter to filter/order translation
//! - Server configuration and logging setup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  atlas-api                   │
//! ├─────────────────────────────────────────────┤
//! │  http/          - HTTP REST endpoints       │
//! │  adapters       - storage → domain bridges  │
//! │  query          - filter & order builders   │
//! │  config         - server configuration      │
//! │  observability/ - logging setup             │
//! └─────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod query;
pub mod validation;

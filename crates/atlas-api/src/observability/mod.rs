//! Observability setup for the Atlas server.

pub mod logging;

pub use logging::{init_logging, LoggingConfig};

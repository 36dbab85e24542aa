//! Observability subsystem.
//!
//! Structured log events through `tracing`; request spans come from
//! tower-http's `TraceLayer` at debug level.

pub mod logging;

pub use logging::init_logging;

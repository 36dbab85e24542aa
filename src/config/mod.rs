//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! command line / environment
//!     → cli.rs (clap, overlays onto defaults)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → handed to listener, HTTP server and runtime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so the binary runs with no arguments

pub mod schema;
pub mod validation;

pub use schema::{
    HttpConfig, ListenerConfig, LogFormat, ObservabilityConfig, RuntimeConfig, ServerConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};

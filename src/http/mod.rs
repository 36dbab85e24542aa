//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper auto builder, HTTP/1.1 or h2c)
//!     → Axum Router fallback
//!     → response.rs (fixed 200 OK, empty body)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{HttpServer, ServerError};

//! HTTP server that answers every request with `200 OK` and an empty body.
//!
//! Built as a load-generation target: no routing, no state, and no request
//! inspection. Framing, keep-alive and malformed-request handling are left
//! to hyper.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────┐    ┌──────────┐    ┌────────────┐
//!     ──────────────────▶│   net    │───▶│   http   │───▶│  response  │
//!                        │ listener │    │  server  │    │  200 OK    │
//!     Client Response    └──────────┘    └──────────┘    └─────┬──────┘
//!     ◀────────────────────────────────────────────────────────┘
//!
//!     Cross-cutting: cli + config, lifecycle (startup/shutdown/signals),
//!                    observability (tracing)
//! ```

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use net::Listener;

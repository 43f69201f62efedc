//! HTTP server module.
//!
//! Serves the router on plain HTTP with graceful shutdown on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};

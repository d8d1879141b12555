//! HTTP server module.
//!
//! Plain HTTP listener with graceful shutdown on SIGTERM/SIGINT. TLS, when
//! wanted, is terminated in front of the service.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};

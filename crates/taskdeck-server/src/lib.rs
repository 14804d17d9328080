//! HTTP API for taskdeck.
//!
//! Translates wire requests into store operations and store outcomes
//! into status codes. The store itself lives behind shared state; this
//! crate adds no semantics beyond validation and mapping.

/// Status-code mapping for request failures.
pub mod error;
/// Request handlers for the five task operations.
pub mod handlers;
/// Router construction, shared state, and the serve loop.
pub mod server;

pub use error::ApiError;
pub use server::{AppState, ServerConfig, router, serve};

//! Middleware for observability.
//!
//! Request logging with latency tracking; authentication middleware lives
//! with the auth module.

pub mod logging;

pub use logging::request_logging;

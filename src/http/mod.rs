//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! endpoint handlers: response builders and the cross-origin policy.

pub mod cors;
pub mod response;

// Re-export commonly used builders
pub use response::{json_response, method_not_allowed, not_found, payload_too_large};

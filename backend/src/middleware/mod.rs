//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and authentication.

pub mod access;
pub mod trace;

pub use access::AccessPolicy;
pub use trace::Trace;

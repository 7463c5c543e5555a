//! Workout tracker backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

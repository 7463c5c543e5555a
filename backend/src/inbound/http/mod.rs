//! HTTP inbound adapter exposing the form-login protected endpoints and the
//! workout log API.

pub mod app;
pub mod error;
pub mod greeting;
pub mod login;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod session_registry;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod workouts;

pub use error::ApiResult;

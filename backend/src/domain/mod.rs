//! Domain types and ports.
//!
//! Purpose: keep authentication and workout concepts free of HTTP and storage
//! concerns.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: error payload shared by adapters.
//! - `LoginCredentials`, `Username`, `Principal`: authentication values.
//! - `Workout`, `ExerciseEntry`, `WorkoutSet`: logged training sessions.
//! - `ports::CredentialVerifier`: the authentication provider contract.
//! - `ports::WorkoutRepository`: per-user workout storage.

pub mod auth;
pub mod error;
pub mod ports;
pub mod workouts;

pub use self::auth::{LoginCredentials, LoginValidationError, Principal, Username};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::workouts::{
    ExerciseEntry, Workout, WorkoutSet, WorkoutValidationError, sort_newest_first,
};

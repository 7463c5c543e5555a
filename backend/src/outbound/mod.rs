//! Outbound adapters implementing domain ports.
//!
//! - **credentials**: users-file backed [`crate::domain::ports::CredentialVerifier`]
//! - **workouts**: in-memory [`crate::domain::ports::WorkoutRepository`]

pub mod credentials;
pub mod workouts;

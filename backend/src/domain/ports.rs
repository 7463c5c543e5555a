//! Ports implemented by outbound adapters.

use async_trait::async_trait;

use super::{Error, LoginCredentials, Principal, Username, Workout};

/// Failure reported by a [`CredentialVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    /// Unknown user or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    BadCredentials,
    /// The provider could not reach a decision.
    #[error("authentication provider unavailable: {0}")]
    Unavailable(String),
}

/// Verifies submitted credentials and yields the authenticated principal.
///
/// The HTTP layer only sees this trait, so any identity store can back the
/// login form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Check `credentials`, returning the matching principal.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Principal, AuthenticationError>;
}

/// Stores workouts and lists them per owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Persist `workout` under its owner.
    async fn save(&self, workout: &Workout) -> Result<(), Error>;

    /// Every workout logged by `owner`, in no particular order.
    async fn list_for(&self, owner: &Username) -> Result<Vec<Workout>, Error>;
}

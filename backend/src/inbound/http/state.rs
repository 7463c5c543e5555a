//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they only depend on
//! domain ports and stay testable without I/O.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;

use crate::domain::ports::{CredentialVerifier, WorkoutRepository};
use crate::inbound::http::session_config::SESSION_TTL_MINUTES;
use crate::inbound::http::session_registry::SessionRegistry;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication provider consulted by the login form.
    pub credentials: Arc<dyn CredentialVerifier>,
    /// Storage for logged workouts.
    pub workouts: Arc<dyn WorkoutRepository>,
    /// Time source for defaulted timestamps and session expiry.
    pub clock: Arc<dyn Clock>,
    /// Session ids issued at login and not yet revoked or lapsed.
    pub sessions: Arc<SessionRegistry>,
}

impl HttpState {
    /// Bundle the given ports. Sessions lapse after the cookie's idle TTL.
    pub fn new(
        credentials: Arc<dyn CredentialVerifier>,
        workouts: Arc<dyn WorkoutRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new(
            Arc::clone(&clock),
            TimeDelta::minutes(SESSION_TTL_MINUTES),
        ));
        Self {
            credentials,
            workouts,
            clock,
            sessions,
        }
    }
}

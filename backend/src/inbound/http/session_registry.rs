//! Server-side record of live login sessions.
//!
//! Cookie sessions carry their whole state on the client, so a copied cookie
//! stays cryptographically valid after logout. Each login therefore gets a
//! random session id that is only honoured while it is registered here.
//! Logout revokes the id; ids idle for longer than the timeout lapse.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use uuid::Uuid;

/// Live session ids and when each was last used.
pub struct SessionRegistry {
    clock: Arc<dyn Clock>,
    idle_timeout: TimeDelta,
    live: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessionRegistry {
    /// Create an empty registry whose sessions lapse after `idle_timeout`.
    pub fn new(clock: Arc<dyn Clock>, idle_timeout: TimeDelta) -> Self {
        Self {
            clock,
            idle_timeout,
            live: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, DateTime<Utc>>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a fresh session id. Lapsed ids are swept at the same time.
    pub fn issue(&self) -> Uuid {
        let now = self.clock.utc();
        let id = Uuid::new_v4();
        let mut live = self.entries();
        live.retain(|_, last_seen| now - *last_seen <= self.idle_timeout);
        live.insert(id, now);
        id
    }

    /// Whether `id` is still live; a live id has its idle timer reset.
    pub fn touch(&self, id: &Uuid) -> bool {
        let now = self.clock.utc();
        let mut live = self.entries();
        match live.get_mut(id) {
            Some(last_seen) if now - *last_seen <= self.idle_timeout => {
                *last_seen = now;
                true
            }
            Some(_) => {
                live.remove(id);
                false
            }
            None => false,
        }
    }

    /// Forget `id`; later requests carrying it are unauthenticated.
    pub fn revoke(&self, id: &Uuid) {
        self.entries().remove(id);
    }

    /// Number of registered ids, lapsed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no ids are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("idle_timeout", &self.idle_timeout)
            .field("live", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::MutableClock;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Arc::new(MutableClock::new(start))
    }

    fn registry(clock: &Arc<MutableClock>) -> SessionRegistry {
        SessionRegistry::new(clock.clone(), TimeDelta::minutes(30))
    }

    #[rstest]
    fn issued_ids_are_live_and_distinct(clock: Arc<MutableClock>) {
        let sessions = registry(&clock);
        let first = sessions.issue();
        let second = sessions.issue();
        assert_ne!(first, second);
        assert!(sessions.touch(&first));
        assert!(sessions.touch(&second));
    }

    #[rstest]
    fn revoked_ids_are_rejected(clock: Arc<MutableClock>) {
        let sessions = registry(&clock);
        let id = sessions.issue();
        sessions.revoke(&id);
        assert!(!sessions.touch(&id));
        assert!(sessions.is_empty());
    }

    #[rstest]
    fn unknown_ids_are_rejected(clock: Arc<MutableClock>) {
        let sessions = registry(&clock);
        assert!(!sessions.touch(&Uuid::new_v4()));
    }

    #[rstest]
    fn activity_keeps_a_session_alive(clock: Arc<MutableClock>) {
        let sessions = registry(&clock);
        let id = sessions.issue();
        for _ in 0..4 {
            clock.advance(TimeDelta::minutes(20));
            assert!(sessions.touch(&id), "active session should not lapse");
        }
    }

    #[rstest]
    fn idle_sessions_lapse(clock: Arc<MutableClock>) {
        let sessions = registry(&clock);
        let id = sessions.issue();
        clock.advance(TimeDelta::minutes(31));
        assert!(!sessions.touch(&id));
        assert!(sessions.is_empty(), "lapsed id should be dropped");
    }

    #[rstest]
    fn issuing_sweeps_lapsed_ids(clock: Arc<MutableClock>) {
        let sessions = registry(&clock);
        sessions.issue();
        clock.advance(TimeDelta::minutes(45));
        sessions.issue();
        assert_eq!(sessions.len(), 1);
    }
}

//! In-memory workout store.
//!
//! Workouts are kept per owner for the lifetime of the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::WorkoutRepository;
use crate::domain::{Error, Username, Workout};

/// [`WorkoutRepository`] backed by a map from owner to workouts.
#[derive(Debug, Default)]
pub struct InMemoryWorkoutRepository {
    by_owner: Mutex<HashMap<Username, Vec<Workout>>>,
}

impl InMemoryWorkoutRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Username, Vec<Workout>>> {
        self.by_owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    async fn save(&self, workout: &Workout) -> Result<(), Error> {
        self.entries()
            .entry(workout.owner().clone())
            .or_default()
            .push(workout.clone());
        Ok(())
    }

    async fn list_for(&self, owner: &Username) -> Result<Vec<Workout>, Error> {
        Ok(self.entries().get(owner).cloned().unwrap_or_default())
    }
}

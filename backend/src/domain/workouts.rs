//! Logged workouts.
//!
//! A workout belongs to the user who logged it and records, per exercise, the
//! sets performed. Construction validates the payload so adapters only ever
//! store well-formed workouts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Username;

/// One set of an exercise. Every measurement is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    /// Load lifted, in the user's unit.
    pub weight: Option<f64>,
    /// Repetitions performed.
    pub reps: Option<u32>,
    /// Free-form duration such as `"00:45"`.
    pub time: Option<String>,
    /// Whether the set was finished.
    pub completed: bool,
}

/// An exercise performed during a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    /// Identifier of the exercise in the client's catalogue.
    pub exercise_id: String,
    /// Sets in the order they were performed.
    pub sets: Vec<WorkoutSet>,
}

/// Reasons a workout payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkoutValidationError {
    /// The name is blank after trimming.
    #[error("Workout name is required")]
    EmptyName,
    /// An exercise has a blank identifier.
    #[error("exercise {index} has no exercise id")]
    EmptyExerciseId {
        /// Position of the exercise in the payload.
        index: usize,
    },
    /// A weight is negative or not a finite number.
    #[error("exercise {exercise} set {set} has an invalid weight")]
    InvalidWeight {
        /// Position of the exercise in the payload.
        exercise: usize,
        /// Position of the set within the exercise.
        set: usize,
    },
}

/// A validated, stored workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: Uuid,
    owner: Username,
    name: String,
    exercises: Vec<ExerciseEntry>,
    completed_at: DateTime<Utc>,
}

impl Workout {
    /// Validate a workout logged by `owner` and assign it a fresh id.
    ///
    /// The name is trimmed and must not be blank. Exercise ids must not be
    /// blank and weights must be finite and non-negative.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use workouttracker::domain::{Username, Workout};
    ///
    /// let owner = Username::new("ada").expect("valid username");
    /// let workout = Workout::new(owner, " Leg day ", Vec::new(), Utc::now()).expect("valid");
    /// assert_eq!(workout.name(), "Leg day");
    /// ```
    pub fn new(
        owner: Username,
        name: &str,
        exercises: Vec<ExerciseEntry>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, WorkoutValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkoutValidationError::EmptyName);
        }
        for (index, exercise) in exercises.iter().enumerate() {
            if exercise.exercise_id.trim().is_empty() {
                return Err(WorkoutValidationError::EmptyExerciseId { index });
            }
            let bad_weight = exercise
                .sets
                .iter()
                .position(|set| set.weight.is_some_and(|w| !w.is_finite() || w < 0.0));
            if let Some(set) = bad_weight {
                return Err(WorkoutValidationError::InvalidWeight {
                    exercise: index,
                    set,
                });
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            name: name.to_owned(),
            exercises,
            completed_at,
        })
    }

    /// Unique identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// User who logged the workout.
    pub fn owner(&self) -> &Username {
        &self.owner
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exercises performed.
    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    /// When the workout was finished.
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

/// Order workouts so the most recently completed comes first.
pub fn sort_newest_first(workouts: &mut [Workout]) {
    workouts.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
}

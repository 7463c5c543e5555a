//! Workout log HTTP handlers.
//!
//! ```text
//! GET  /api/workouts
//! POST /api/workouts
//! ```
//!
//! Workouts are scoped to the signed-in user; the owner always comes from the
//! session, never from the payload.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, ExerciseEntry, Workout, WorkoutSet, WorkoutValidationError, sort_newest_first,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One set within an exercise.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSetBody {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub time: Option<String>,
    pub completed: bool,
}

/// One exercise and its sets.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseBody {
    pub exercise_id: String,
    pub sets: Vec<WorkoutSetBody>,
}

/// Request payload for logging a workout.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequestBody {
    pub name: String,
    pub exercises: Vec<ExerciseBody>,
    /// RFC 3339 timestamp; defaults to the time of the request.
    pub completed_at: Option<String>,
}

/// A logged workout.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub id: String,
    pub name: String,
    pub exercises: Vec<ExerciseBody>,
    pub completed_at: String,
}

/// Response payload for listing workouts.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkoutsResponseBody {
    pub workouts: Vec<WorkoutResponse>,
}

impl From<WorkoutSetBody> for WorkoutSet {
    fn from(value: WorkoutSetBody) -> Self {
        Self {
            weight: value.weight,
            reps: value.reps,
            time: value.time,
            completed: value.completed,
        }
    }
}

impl From<&WorkoutSet> for WorkoutSetBody {
    fn from(value: &WorkoutSet) -> Self {
        Self {
            weight: value.weight,
            reps: value.reps,
            time: value.time.clone(),
            completed: value.completed,
        }
    }
}

impl From<ExerciseBody> for ExerciseEntry {
    fn from(value: ExerciseBody) -> Self {
        Self {
            exercise_id: value.exercise_id,
            sets: value.sets.into_iter().map(WorkoutSet::from).collect(),
        }
    }
}

impl From<&ExerciseEntry> for ExerciseBody {
    fn from(value: &ExerciseEntry) -> Self {
        Self {
            exercise_id: value.exercise_id.clone(),
            sets: value.sets.iter().map(WorkoutSetBody::from).collect(),
        }
    }
}

impl From<&Workout> for WorkoutResponse {
    fn from(value: &Workout) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            exercises: value.exercises().iter().map(ExerciseBody::from).collect(),
            completed_at: value.completed_at().to_rfc3339(),
        }
    }
}

fn parse_timestamp(value: String, field: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            Error::invalid_request(format!("{field} must be an RFC 3339 timestamp")).with_details(
                json!({
                    "field": field,
                    "value": value,
                    "code": "invalid_timestamp",
                }),
            )
        })
}

fn map_validation_error(err: WorkoutValidationError) -> Error {
    let (field, code) = match err {
        WorkoutValidationError::EmptyName => ("name".to_owned(), "missing_name"),
        WorkoutValidationError::EmptyExerciseId { index } => (
            format!("exercises[{index}].exerciseId"),
            "invalid_exercise_id",
        ),
        WorkoutValidationError::InvalidWeight { exercise, set } => (
            format!("exercises[{exercise}].sets[{set}].weight"),
            "invalid_weight",
        ),
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// List the signed-in user's workouts, most recently completed first.
#[utoipa::path(
    get,
    path = "/api/workouts",
    responses(
        (status = 200, description = "Workouts, newest first", body = ListWorkoutsResponseBody),
        (status = 302, description = "No session; redirect to /login"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["workouts"],
    operation_id = "listWorkouts",
    security(("SessionCookie" = []))
)]
#[get("/api/workouts")]
pub async fn list_workouts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListWorkoutsResponseBody>> {
    let principal = session.require_principal()?;
    let mut workouts = state.workouts.list_for(principal.username()).await?;
    sort_newest_first(&mut workouts);
    Ok(web::Json(ListWorkoutsResponseBody {
        workouts: workouts.iter().map(WorkoutResponse::from).collect(),
    }))
}

/// Log a workout for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = CreateWorkoutRequestBody,
    responses(
        (status = 201, description = "Workout saved", body = WorkoutResponse),
        (status = 302, description = "No session; redirect to /login"),
        (status = 400, description = "Invalid workout data", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["workouts"],
    operation_id = "createWorkout",
    security(("SessionCookie" = []))
)]
#[post("/api/workouts")]
pub async fn create_workout(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateWorkoutRequestBody>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let CreateWorkoutRequestBody {
        name,
        exercises,
        completed_at,
    } = payload.into_inner();
    let completed_at = match completed_at {
        Some(raw) => parse_timestamp(raw, "completedAt")?,
        None => state.clock.utc(),
    };
    let exercises = exercises.into_iter().map(ExerciseEntry::from).collect();
    let workout = Workout::new(principal.username().clone(), &name, exercises, completed_at)
        .map_err(map_validation_error)?;

    state.workouts.save(&workout).await?;
    info!(
        username = %principal.username(),
        workout_id = %workout.id(),
        "workout saved"
    );
    Ok(HttpResponse::Created().json(WorkoutResponse::from(&workout)))
}

#[cfg(test)]
#[path = "workouts_tests.rs"]
mod tests;

//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the HTTP surface. It registers:
//!
//! - **Paths**: the greeting page, the form login endpoints and the workout log
//! - **Schemas**: Domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]),
//!   the login form body and the workout payloads
//! - **Security**: Session cookie authentication scheme
//!
//! The generated document is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::login::LoginForm;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::workouts::{
    CreateWorkoutRequestBody, ExerciseBody, ListWorkoutsResponseBody, WorkoutResponse,
    WorkoutSetBody,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Workout tracker backend",
        description = "Form-login protected greeting endpoint and workout log."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::greeting::main_page,
        crate::inbound::http::login::login_page,
        crate::inbound::http::login::submit_login,
        crate::inbound::http::login::logout,
        crate::inbound::http::workouts::list_workouts,
        crate::inbound::http::workouts::create_workout,
    ),
    components(schemas(
        LoginForm,
        ErrorSchema,
        ErrorCodeSchema,
        CreateWorkoutRequestBody,
        ExerciseBody,
        WorkoutSetBody,
        WorkoutResponse,
        ListWorkoutsResponseBody
    )),
    tags(
        (name = "greeting", description = "Pages served to signed-in users"),
        (name = "authentication", description = "Form login and logout"),
        (name = "workouts", description = "Per-user workout log")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/main", "/login", "/logout", "/api/workouts"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_login_path_has_get_and_post() {
        let doc = ApiDoc::openapi();
        let login = doc.paths.paths.get("/login").expect("/login path");
        assert!(login.get.is_some(), "GET /login should be documented");
        assert!(login.post.is_some(), "POST /login should be documented");
    }

    #[test]
    fn openapi_workouts_path_has_get_and_post() {
        let doc = ApiDoc::openapi();
        let workouts = doc.paths.paths.get("/api/workouts").expect("/api/workouts path");
        assert!(workouts.get.is_some(), "GET /api/workouts should be documented");
        assert!(workouts.post.is_some(), "POST /api/workouts should be documented");
    }

    #[test]
    fn openapi_registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}

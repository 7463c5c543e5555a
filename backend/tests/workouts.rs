//! End-to-end behaviour of the workout log behind form login.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::web;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use workouttracker::inbound::http::app::{AppDependencies, SESSION_COOKIE_NAME, build_app};
use workouttracker::inbound::http::session_config::SessionSettings;
use workouttracker::inbound::http::state::HttpState;
use workouttracker::outbound::credentials::{
    InMemoryCredentialVerifier, UserRecord, hash_password,
};
use workouttracker::outbound::workouts::InMemoryWorkoutRepository;

const PASSWORD: &str = "correct horse battery staple";

#[fixture]
fn deps() -> AppDependencies {
    let hash = hash_password(PASSWORD).expect("hash fixture password");
    let records = ["ada", "grace"]
        .into_iter()
        .map(|username| UserRecord {
            username: username.to_owned(),
            password_hash: hash.clone(),
        })
        .collect();
    let verifier = InMemoryCredentialVerifier::new(records).expect("verifier fixture");
    let state = HttpState::new(
        Arc::new(verifier),
        Arc::new(InMemoryWorkoutRepository::new()),
        Arc::new(mockable::DefaultClock),
    );
    AppDependencies {
        http_state: web::Data::new(state),
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
    }
}

async fn init(
    deps: AppDependencies,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(build_app(deps)).await
}

async fn sign_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", PASSWORD)])
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("login should issue a session cookie")
}

fn post_workout(cookie: Cookie<'static>, body: &Value) -> Request {
    TestRequest::post()
        .uri("/api/workouts")
        .cookie(cookie)
        .set_json(body)
        .to_request()
}

fn list_workouts(cookie: Cookie<'static>) -> Request {
    TestRequest::get()
        .uri("/api/workouts")
        .cookie(cookie)
        .to_request()
}

fn names(body: &Value) -> Vec<String> {
    body["workouts"]
        .as_array()
        .expect("workouts array")
        .iter()
        .filter_map(|workout| workout["name"].as_str().map(str::to_owned))
        .collect()
}

#[rstest]
#[case(TestRequest::get())]
#[case(TestRequest::post().set_json(json!({ "name": "Legs", "exercises": [] })))]
#[actix_web::test]
async fn anonymous_clients_are_sent_to_login(deps: AppDependencies, #[case] req: TestRequest) {
    let app = init(deps).await;

    let res = test::call_service(&app, req.uri("/api/workouts").to_request()).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/login")
    );
}

#[rstest]
#[actix_web::test]
async fn logged_workouts_are_listed_newest_first(deps: AppDependencies) {
    let app = init(deps).await;
    let cookie = sign_in(&app, "ada").await;

    for (name, completed_at) in [
        ("Monday", "2026-03-02T07:00:00Z"),
        ("Wednesday", "2026-03-04T07:00:00Z"),
        ("Tuesday", "2026-03-03T07:00:00Z"),
    ] {
        let body = json!({
            "name": name,
            "exercises": [{
                "exerciseId": "bench-press",
                "sets": [{ "weight": 60.0, "reps": 8, "completed": true }]
            }],
            "completedAt": completed_at,
        });
        let res = test::call_service(&app, post_workout(cookie.clone(), &body)).await;
        assert_eq!(res.status(), StatusCode::CREATED, "{name}");
    }

    let body: Value = test::call_and_read_body_json(&app, list_workouts(cookie)).await;
    assert_eq!(names(&body), ["Wednesday", "Tuesday", "Monday"]);
    assert_eq!(body["workouts"][0]["exercises"][0]["exerciseId"], "bench-press");
    assert_eq!(body["workouts"][0]["exercises"][0]["sets"][0]["reps"], 8);
}

#[rstest]
#[actix_web::test]
async fn workouts_are_private_to_their_owner(deps: AppDependencies) {
    let app = init(deps).await;
    let ada = sign_in(&app, "ada").await;
    let grace = sign_in(&app, "grace").await;

    let res = test::call_service(
        &app,
        post_workout(ada.clone(), &json!({ "name": "Ada's run", "exercises": [] })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::call_and_read_body_json(&app, list_workouts(grace)).await;
    assert!(names(&body).is_empty());
    let body: Value = test::call_and_read_body_json(&app, list_workouts(ada)).await;
    assert_eq!(names(&body), ["Ada's run"]);
}

#[rstest]
#[actix_web::test]
async fn invalid_workout_is_rejected_and_not_stored(deps: AppDependencies) {
    let app = init(deps).await;
    let cookie = sign_in(&app, "ada").await;

    let res = test::call_service(
        &app,
        post_workout(cookie.clone(), &json!({ "name": "", "exercises": [] })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "Workout name is required");
    assert_eq!(body["details"]["field"], "name");

    let body: Value = test::call_and_read_body_json(&app, list_workouts(cookie)).await;
    assert!(names(&body).is_empty());
}

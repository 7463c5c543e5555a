//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn failures into consistent JSON responses and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let redacted = Error::internal("Internal server error");
        match error.trace_id() {
            Some(id) => redacted.with_trace_id(id.to_owned()),
            None => redacted,
        }
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = %self.message(), trace_id = ?self.trace_id(), "internal error");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

/// JSON extractor settings: malformed bodies become `invalid_request` errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejected JSON body");
        Error::invalid_request(format!("invalid JSON body: {err}"))
            .with_details(json!({ "code": "invalid_body" }))
            .into()
    })
}

/// Form extractor settings: malformed bodies become `invalid_request` errors.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejected form body");
        Error::invalid_request(format!("invalid form body: {err}"))
            .with_details(json!({ "code": "invalid_body" }))
            .into()
    })
}

/// Fallback service for unmatched routes.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("no such resource"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::header;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde::Deserialize;

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    async fn render(error: &Error) -> (StatusCode, Option<String>, Error) {
        let response = ResponseError::error_response(error);
        let status = response.status();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .map(|value| value.to_str().expect("ascii header").to_owned());
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        let payload = serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds");
        (status, header, payload)
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[core::prelude::v1::test]
    fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(ResponseError::status_code(&error), status);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let error = Error::internal("db password is hunter2")
            .with_trace_id(TRACE_ID)
            .with_details(json!({"secret": "x"}));
        let (status, header, payload) = render(&error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header.as_deref(), Some(TRACE_ID));
        assert_eq!(payload.message(), "Internal server error");
        assert!(payload.details().is_none());
        assert_eq!(payload.trace_id(), Some(TRACE_ID));
    }

    #[actix_web::test]
    async fn client_errors_keep_details() {
        let error = Error::invalid_request("bad").with_details(json!({"field": "username"}));
        let (status, header, payload) = render(&error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(header.is_none());
        assert_eq!(payload, error);
    }

    #[derive(Deserialize)]
    struct Named {
        #[expect(dead_code, reason = "only deserialised")]
        name: String,
    }

    async fn echo_json(_body: web::Json<Named>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn echo_form(_body: web::Form<Named>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[rstest]
    #[case("application/json", "{\"name\": 5}")]
    #[case("application/json", "not json")]
    #[case("text/plain", "{\"name\": \"x\"}")]
    #[actix_web::test]
    async fn malformed_json_is_an_invalid_request(#[case] content_type: &str, #[case] body: &str) {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/json", web::post().to(echo_json)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/json")
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body.to_owned())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload: Error = test::read_body_json(res).await;
        assert_eq!(payload.code(), ErrorCode::InvalidRequest);
        assert_eq!(payload.details(), Some(&json!({ "code": "invalid_body" })));
    }

    #[actix_web::test]
    async fn malformed_form_is_an_invalid_request() {
        let app = test::init_service(
            App::new()
                .app_data(form_config())
                .route("/form", web::post().to(echo_form)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/form")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{}")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload: Error = test::read_body_json(res).await;
        assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    }
}

//! Greeting endpoint.
//!
//! ```text
//! GET /main
//! ```

use actix_web::{HttpResponse, get, http::header::ContentType};

/// Body served by [`main_page`].
pub const GREETING: &str = "Hello!";

/// Return the greeting. Authentication is enforced by the access policy
/// middleware before this handler runs.
#[utoipa::path(
    get,
    path = "/main",
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain"),
        (status = 302, description = "No session; redirected to /login")
    ),
    tags = ["greeting"],
    operation_id = "mainPage"
)]
#[get("/main")]
pub async fn main_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(GREETING)
}

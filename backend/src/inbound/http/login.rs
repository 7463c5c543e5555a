//! Form login endpoints.
//!
//! ```text
//! GET  /login            login page (?error, ?logout banners)
//! POST /login            username=...&password=...
//! POST /logout
//! ```
//!
//! Every outcome of a form submission is a `302`: `/main` on success and
//! `/login?error` otherwise, whatever URL the client originally asked for.

use actix_web::http::header::{self, CacheControl, CacheDirective, ContentType};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use zeroize::Zeroize;

use crate::domain::LoginCredentials;
use crate::domain::ports::AuthenticationError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login challenge shown to unauthenticated clients.
pub const LOGIN_URL: &str = "/login";
/// Where a failed submission lands.
pub const LOGIN_FAILURE_URL: &str = "/login?error";
/// Where every successful submission lands.
pub const DEFAULT_SUCCESS_URL: &str = "/main";
/// Logout endpoint.
pub const LOGOUT_URL: &str = "/logout";
/// Where the client lands after logging out.
pub const LOGOUT_SUCCESS_URL: &str = "/login?logout";

const BAD_CREDENTIALS_MESSAGE: &str = "Invalid username and password.";
const LOGGED_OUT_MESSAGE: &str = "You have been signed out.";

/// `302 Found` pointing at `location`.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Banner flags accepted by the login page. Presence matters, not value, and
/// repeated or unknown parameters are ignored.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoginPageQuery {
    error: bool,
    logout: bool,
}

impl LoginPageQuery {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let has = |flag: &str| pairs.iter().any(|(name, _)| name == flag);
        Self {
            error: has("error"),
            logout: has("logout"),
        }
    }
}

/// Form fields posted to `/login`. Missing fields count as blank.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginForm {
    /// Submitted username.
    #[serde(default)]
    pub username: String,
    /// Submitted password.
    #[serde(default)]
    pub password: String,
}

fn render_login_page(query: &LoginPageQuery) -> String {
    let banner = if query.error {
        format!(r#"<p class="alert alert-danger" role="alert">{BAD_CREDENTIALS_MESSAGE}</p>"#)
    } else if query.logout {
        format!(r#"<p class="alert alert-success" role="alert">{LOGGED_OUT_MESSAGE}</p>"#)
    } else {
        String::new()
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Please sign in</title>
  </head>
  <body>
    <form method="post" action="{LOGIN_URL}">
      <h2>Please sign in</h2>
      {banner}
      <p>
        <label for="username">Username</label>
        <input type="text" id="username" name="username" autocomplete="username" required autofocus>
      </p>
      <p>
        <label for="password">Password</label>
        <input type="password" id="password" name="password" autocomplete="current-password" required>
      </p>
      <button type="submit">Sign in</button>
    </form>
  </body>
</html>
"#
    )
}

/// Serve the login form.
#[utoipa::path(
    get,
    path = "/login",
    params(
        ("error" = Option<String>, Query, description = "Show the failed-login banner"),
        ("logout" = Option<String>, Query, description = "Show the signed-out banner")
    ),
    responses((status = 200, description = "Login form", content_type = "text/html")),
    tags = ["authentication"],
    operation_id = "loginPage",
    security([])
)]
#[get("/login")]
pub async fn login_page(query: web::Query<Vec<(String, String)>>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header(CacheControl(vec![CacheDirective::NoStore]))
        .body(render_login_page(&LoginPageQuery::from_pairs(&query)))
}

/// Verify submitted credentials and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to /main on success or /login?error on failure",
            headers(("Location" = String), ("Set-Cookie" = String, description = "Session cookie"))),
        (status = 500, description = "Session could not be persisted")
    ),
    tags = ["authentication"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn submit_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm {
        username,
        mut password,
    } = form.into_inner();
    let parsed = LoginCredentials::try_from_parts(&username, &password);
    password.zeroize();
    let credentials = match parsed {
        Ok(credentials) => credentials,
        Err(error) => {
            warn!(%error, "login form rejected");
            return Ok(found(LOGIN_FAILURE_URL));
        }
    };

    match state.credentials.authenticate(&credentials).await {
        Ok(principal) => {
            if let Ok(Some(previous)) = session.session_id() {
                state.sessions.revoke(&previous);
            }
            let session_id = state.sessions.issue();
            if let Err(error) = session.establish(&principal, session_id) {
                state.sessions.revoke(&session_id);
                return Err(error);
            }
            info!(username = %principal.username(), "login succeeded");
            Ok(found(DEFAULT_SUCCESS_URL))
        }
        Err(AuthenticationError::BadCredentials) => {
            warn!(username = %credentials.username(), "login failed: bad credentials");
            Ok(found(LOGIN_FAILURE_URL))
        }
        Err(AuthenticationError::Unavailable(reason)) => {
            error!(
                username = %credentials.username(),
                %reason,
                "login failed: authentication provider unavailable"
            );
            Ok(found(LOGIN_FAILURE_URL))
        }
    }
}

/// End the session. Its id is revoked, so copies of the cookie stop working.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 302, description = "Redirect to /login?logout", headers(("Location" = String)))),
    tags = ["authentication"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if let Ok(Some(principal)) = session.principal() {
        info!(username = %principal.username(), "logout");
    }
    if let Ok(Some(session_id)) = session.session_id() {
        state.sessions.revoke(&session_id);
    }
    session.purge();
    found(LOGOUT_SUCCESS_URL)
}

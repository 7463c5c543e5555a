//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers and middleware
//! only deal with principals and session ids.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::{Error, Principal, Username};

pub(crate) const PRINCIPAL_KEY: &str = "principal";
pub(crate) const SESSION_ID_KEY: &str = "sid";

/// Newtype wrapper that exposes principal-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start an authenticated session for `principal` under `session_id`.
    ///
    /// The session identifier is renewed first so a cookie issued before
    /// login cannot be reused afterwards.
    pub fn establish(&self, principal: &Principal, session_id: Uuid) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(PRINCIPAL_KEY, principal.username().as_ref())
            .and_then(|()| self.0.insert(SESSION_ID_KEY, session_id))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Server-side id of this login, if one was established.
    pub fn session_id(&self) -> Result<Option<Uuid>, Error> {
        self.0
            .get::<Uuid>(SESSION_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Fetch the principal stored in the session, if present and well formed.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        let raw = self
            .0
            .get::<String>(PRINCIPAL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|name| match Username::new(&name) {
            Ok(username) => Some(Principal::new(username)),
            Err(error) => {
                tracing::warn!(%error, "invalid principal in session cookie");
                None
            }
        }))
    }

    /// Require a principal or return `401 Unauthorized`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop all session state; the cookie is removed on the response.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const FIXTURE_SESSION_ID: Uuid = Uuid::from_u128(0x5eed);

    fn principal(name: &str) -> Principal {
        Principal::new(Username::new(name).expect("fixture username"))
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let principal = session.require_principal()?;
        Ok(HttpResponse::Ok().body(principal.username().to_string()))
    }

    #[actix_web::test]
    async fn round_trips_principal() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.establish(&principal("ada"), FIXTURE_SESSION_ID)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route("/get", web::get().to(whoami))
                .route(
                    "/sid",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.session_id()?.map(|id| id.to_string());
                        Ok::<_, Error>(HttpResponse::Ok().body(id.unwrap_or_default()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res).expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie.clone()).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(test::read_body(get_res).await, "ada");

        let sid_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/sid").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(
            test::read_body(sid_res).await,
            FIXTURE_SESSION_ID.to_string()
        );
    }

    #[actix_web::test]
    async fn missing_principal_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/get", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_principal_is_ignored() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(PRINCIPAL_KEY, "   ")
                            .expect("set blank principal");
                        HttpResponse::Ok()
                    }),
                )
                .route("/get", web::get().to(whoami)),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res).expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

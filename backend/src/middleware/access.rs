//! Access policy middleware: every request must carry an authenticated
//! session unless it targets one of the explicitly permitted endpoints.
//!
//! Unauthenticated requests never reach the wrapped service; they receive a
//! `302 Found` pointing at the login challenge instead. A session counts as
//! authenticated only while its id is live in the [`SessionRegistry`], so a
//! cookie replayed after logout or after the idle timeout is refused. The
//! middleware reads the session, so it must be registered *inside* the session
//! middleware (i.e. `.wrap(AccessPolicy)` before `.wrap(SessionMiddleware)`).

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::Error;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::inbound::http::login::{LOGIN_URL, LOGOUT_URL, found};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::session_registry::SessionRegistry;

#[derive(Clone, Debug)]
struct Rules {
    permitted: Vec<(Method, String)>,
    login_url: String,
    sessions: Arc<SessionRegistry>,
}

impl Rules {
    fn permits(&self, method: &Method, path: &str) -> bool {
        self.permitted
            .iter()
            .any(|(allowed, allowed_path)| allowed == method && allowed_path == path)
    }
}

/// Declarative authorisation rules for the whole application.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::http::Method;
/// use chrono::TimeDelta;
/// use workouttracker::inbound::http::session_registry::SessionRegistry;
/// use workouttracker::middleware::AccessPolicy;
///
/// let sessions = Arc::new(SessionRegistry::new(
///     Arc::new(mockable::DefaultClock),
///     TimeDelta::minutes(30),
/// ));
/// let policy = AccessPolicy::authenticated("/login", sessions).permit(Method::GET, "/login");
/// assert!(policy.is_permitted(&Method::GET, "/login"));
/// assert!(!policy.is_permitted(&Method::GET, "/main"));
/// ```
#[derive(Clone, Debug)]
pub struct AccessPolicy {
    rules: Arc<Rules>,
}

impl AccessPolicy {
    /// Require authentication for everything, redirecting to `login_url`.
    /// Only session ids live in `sessions` are accepted.
    pub fn authenticated(login_url: impl Into<String>, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            rules: Arc::new(Rules {
                permitted: Vec::new(),
                login_url: login_url.into(),
                sessions,
            }),
        }
    }

    /// Let `method path` through without a session.
    #[must_use]
    pub fn permit(mut self, method: Method, path: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.rules)
            .permitted
            .push((method, path.into()));
        self
    }

    /// The form-login policy: only the login challenge, the credential
    /// submission and logout are public.
    pub fn form_login(sessions: Arc<SessionRegistry>) -> Self {
        Self::authenticated(LOGIN_URL, sessions)
            .permit(Method::GET, LOGIN_URL)
            .permit(Method::POST, LOGIN_URL)
            .permit(Method::POST, LOGOUT_URL)
    }

    /// Whether `method path` bypasses the session check.
    pub fn is_permitted(&self, method: &Method, path: &str) -> bool {
        self.rules.permits(method, path)
    }
}

fn is_authenticated(req: &ServiceRequest, sessions: &SessionRegistry) -> bool {
    let session = SessionContext::new(req.get_session());
    let state = session
        .principal()
        .and_then(|principal| Ok((principal, session.session_id()?)));
    match state {
        Ok((Some(_), Some(id))) if sessions.touch(&id) => true,
        Ok((None, None)) => false,
        Ok(_) => {
            debug!("revoked, lapsed or partial session discarded");
            session.purge();
            false
        }
        Err(error) => {
            warn!(%error, "session unreadable; treating request as unauthenticated");
            false
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessPolicy
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessPolicyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessPolicyMiddleware {
            service,
            rules: Arc::clone(&self.rules),
        }))
    }
}

/// Service produced by [`AccessPolicy`].
pub struct AccessPolicyMiddleware<S> {
    service: S,
    rules: Arc<Rules>,
}

impl<S, B> Service<ServiceRequest> for AccessPolicyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.rules.permits(req.method(), req.path())
            || is_authenticated(&req, &self.rules.sessions)
        {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        debug!(
            method = %req.method(),
            path = %req.path(),
            "unauthenticated request redirected to login"
        );
        let response = found(&self.rules.login_url);
        Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
    }
}

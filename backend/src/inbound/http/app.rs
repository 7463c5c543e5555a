//! Application assembly: routes, session handling and the access policy.
//!
//! Shared by the server binary and the integration tests so both exercise the
//! same middleware stack.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::inbound::http::error::{form_config, json_config, not_found};
use crate::inbound::http::greeting::main_page;
use crate::inbound::http::login::{login_page, logout, submit_login};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::workouts::{create_workout, list_workouts};
use crate::middleware::AccessPolicy;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Everything [`build_app`] needs from the outside world.
#[derive(Clone)]
pub struct AppDependencies {
    /// Handler state: ports, clock and the live session registry.
    pub http_state: web::Data<HttpState>,
    /// Cookie session configuration.
    pub session: SessionSettings,
}

/// Build the application.
///
/// Middleware order, outermost first: [`Trace`], the cookie session, then
/// [`AccessPolicy::form_login`], which needs the session to be loaded.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        session,
    } = deps;
    let sessions = http_state.sessions.clone();

    App::new()
        .app_data(http_state)
        .app_data(json_config())
        .app_data(form_config())
        .service(main_page)
        .service(login_page)
        .service(submit_login)
        .service(logout)
        .service(list_workouts)
        .service(create_workout)
        .default_service(web::to(not_found))
        .wrap(AccessPolicy::form_login(sessions))
        .wrap(session.middleware())
        .wrap(Trace)
}

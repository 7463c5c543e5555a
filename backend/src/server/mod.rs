//! Server construction.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use mockable::DefaultClock;

use workouttracker::inbound::http::app::{AppDependencies, build_app};
use workouttracker::inbound::http::state::HttpState;
use workouttracker::outbound::workouts::InMemoryWorkoutRepository;

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        credentials,
        bind_addr,
    } = config;
    let http_state = HttpState::new(
        credentials,
        Arc::new(InMemoryWorkoutRepository::new()),
        Arc::new(DefaultClock),
    );
    let deps = AppDependencies {
        http_state: web::Data::new(http_state),
        session,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    Ok(server)
}

//! Tests for the backend application bootstrap.

use super::server::{ServerConfig, create_server};
use actix_web::cookie::{Key, SameSite};
use rstest::{fixture, rstest};
use std::net::SocketAddr;
use std::sync::Arc;
use workouttracker::inbound::http::session_config::SessionSettings;
use workouttracker::outbound::credentials::InMemoryCredentialVerifier;

#[fixture]
fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[rstest]
#[actix_web::test]
async fn create_server_binds_ephemeral_port(
    session_settings: SessionSettings,
    bind_address: SocketAddr,
) {
    let config = ServerConfig::new(
        session_settings,
        Arc::new(InMemoryCredentialVerifier::new(Vec::new()).expect("empty verifier")),
        bind_address,
    );
    assert_eq!(config.bind_addr(), bind_address);

    let server = create_server(config).expect("server should bind");
    server.handle().stop(false).await;
}

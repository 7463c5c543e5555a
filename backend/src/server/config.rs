//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use workouttracker::domain::ports::CredentialVerifier;
use workouttracker::inbound::http::session_config::SessionSettings;

/// Everything needed to create the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) credentials: Arc<dyn CredentialVerifier>,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        credentials: Arc<dyn CredentialVerifier>,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            session,
            credentials,
            bind_addr,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

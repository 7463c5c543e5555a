//! Server settings loaded via OrthoConfig.
//!
//! Values come from `WORKOUTTRACKER_*` environment variables, configuration
//! files and command-line flags, in OrthoConfig's usual precedence.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_USERS_FILE: &str = "/etc/workouttracker/users.json";

/// Listener and account settings for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORKOUTTRACKER")]
pub struct AppSettings {
    /// IP address to listen on.
    pub host: Option<String>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// JSON users file holding Argon2 password hashes.
    pub users_file: Option<PathBuf>,
}

impl AppSettings {
    /// Return the configured host, falling back to the default.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to the default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the configured users file, falling back to the default.
    pub fn users_file(&self) -> PathBuf {
        self.users_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_USERS_FILE))
    }

    /// Socket address to bind; the host must be an IP literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host().parse()?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}

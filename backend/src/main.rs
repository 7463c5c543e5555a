//! Backend entry-point: loads settings and accounts, then serves the
//! form-login protected pages.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use workouttracker::inbound::http::session_config::fingerprint::key_fingerprint;
use workouttracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use workouttracker::outbound::credentials::InMemoryCredentialVerifier;
use workouttracker::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("invalid settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid host {}: {e}", settings.host())))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let users_file = settings.users_file();
    let verifier =
        InMemoryCredentialVerifier::from_json_file(&users_file).map_err(std::io::Error::other)?;
    info!(
        path = %users_file.display(),
        accounts = verifier.len(),
        "users file loaded"
    );
    if verifier.is_empty() {
        warn!("users file holds no accounts; nobody can sign in");
    }

    let config = ServerConfig::new(session, Arc::new(verifier), bind_addr);
    info!(addr = %config.bind_addr(), "starting server");
    create_server(config)?.await
}

#[cfg(test)]
mod tests;

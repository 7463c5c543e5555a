//! Session configuration parsing and validation.
//!
//! This module centralises the environment-driven session settings so they are
//! validated consistently and can be tested in isolation. Debug builds fall
//! back to permissive defaults with a warning; release builds refuse to start
//! with missing or unsafe values.

pub mod fingerprint;
mod parsing;

use actix_session::config::{CookieContentSecurity, PersistentSession, TtlExtensionPolicy};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

use parsing::{BoolEnvConfig, debug_warn_or_error, parse_bool_env, parse_same_site_value};

use super::app::SESSION_COOKIE_NAME;

/// Path read when `SESSION_KEY_FILE` is unset.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Minimum key material accepted at all; shorter input cannot derive a key.
pub const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;
/// Idle lifetime of an authenticated session.
pub const SESSION_TTL_MINUTES: i64 = 30;
/// Whether the session cookie carries the `Secure` attribute.
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// `SameSite` policy for the session cookie.
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
/// Permit a generated key when the key file is unreadable.
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
/// Location of the session key file.
pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";

/// Read access to environment variables.
///
/// Blanket-implemented for every [`mockable::Env`], so production code passes
/// `mockable::DefaultEnv` and tests pass `mockable::MockEnv`.
pub trait SessionEnv {
    /// Value of `name`, if set.
    fn string(&self, name: &str) -> Option<String>;
}

impl<E: mockable::Env> SessionEnv for E {
    fn string(&self, name: &str) -> Option<String> {
        mockable::Env::string(self, name)
    }
}

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings derived from configuration toggles.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Cookie session middleware honouring these settings.
    ///
    /// Cookies are `HttpOnly`, encrypted, scoped to `/`, and expire after
    /// [`SESSION_TTL_MINUTES`] without a request. Every request that carries
    /// the cookie receives a refreshed one.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default()
                    .session_ttl(Duration::minutes(SESSION_TTL_MINUTES))
                    .session_ttl_extension_policy(TtlExtensionPolicy::OnEveryRequest),
            )
            .build()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for the build mode.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes read.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use workouttracker::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// // Debug builds fall back to a generated key and secure, Lax cookies.
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_env(
        env,
        mode,
        BoolEnvConfig::new(COOKIE_SECURE_ENV, true),
        |flag, _| Ok(flag),
    )?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_env(
        env,
        mode,
        BoolEnvConfig::new(ALLOW_EPHEMERAL_ENV, false),
        |flag, mode| {
            if flag && !mode.is_debug() {
                Err(SessionConfigError::EphemeralNotAllowed)
            } else {
                Ok(flag)
            }
        },
    )?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site_from_env<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    match env.string(SAMESITE_ENV) {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            || warn!("SESSION_SAMESITE not set; using default"),
        ),
    }
}

fn session_key_from_env<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = match mode {
                BuildMode::Release => SESSION_KEY_MIN_LEN,
                BuildMode::Debug => SESSION_KEY_DERIVE_MIN_LEN,
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

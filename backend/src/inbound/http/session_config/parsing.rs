//! Environment parsing helpers for session configuration.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError, SessionEnv};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean toggle and the value debug builds fall back to.
pub(super) struct BoolEnvConfig {
    name: &'static str,
    default_value: bool,
}

impl BoolEnvConfig {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }

    fn default_label(&self) -> &'static str {
        if self.default_value {
            "enabled"
        } else {
            "disabled"
        }
    }
}

/// Read a boolean toggle, passing parsed values through `validate`.
pub(super) fn parse_bool_env<E, F>(
    env: &E,
    mode: BuildMode,
    config: BoolEnvConfig,
    validate: F,
) -> Result<bool, SessionConfigError>
where
    E: SessionEnv,
    F: FnOnce(bool, BuildMode) -> Result<bool, SessionConfigError>,
{
    let Some(value) = env.string(config.name) else {
        return debug_warn_or_error(
            mode,
            config.default_value,
            SessionConfigError::MissingEnv { name: config.name },
            || warn!("{} not set; defaulting to {}", config.name, config.default_label()),
        );
    };

    match parse_bool(&value) {
        Some(flag) => validate(flag, mode),
        None => {
            let label = config.default_label();
            debug_warn_or_error(
                mode,
                config.default_value,
                SessionConfigError::InvalidEnv {
                    name: config.name,
                    value: value.clone(),
                    expected: BOOL_EXPECTED,
                },
                || warn!(value = %value, "invalid {}; defaulting to {}", config.name, label),
            )
        }
    }
}

/// Debug builds warn and use `fallback`; release builds fail with `error`.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                debug_warn_or_error(mode, (), SessionConfigError::InsecureSameSiteNone, || {
                    warn!(
                        "SESSION_SAMESITE=None with SESSION_COOKIE_SECURE=0; browsers may reject the cookie"
                    );
                })?;
            }
            Ok(SameSite::None)
        }
        _ => warn_or_invalid_same_site(value, mode, default_same_site),
    }
}

fn warn_or_invalid_same_site(
    value: String,
    mode: BuildMode,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    if mode.is_debug() {
        warn!(value = %value, "invalid SESSION_SAMESITE, using default");
        return Ok(default_same_site);
    }
    Err(SessionConfigError::InvalidEnv {
        name: SAMESITE_ENV,
        value,
        expected: SAMESITE_EXPECTED,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case("YES", Some(true))]
    #[case("y", Some(true))]
    #[case("False", Some(false))]
    #[case("n", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn parses_boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}

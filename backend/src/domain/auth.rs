//! Authentication value types: submitted credentials and the resulting
//! principal.

use std::fmt;

use zeroize::Zeroize;

/// Longest username accepted by [`Username::new`].
pub const USERNAME_MAX_LEN: usize = 64;

/// Validation failures for login input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// The username was empty once surrounding whitespace was removed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeds [`USERNAME_MAX_LEN`] characters.
    #[error("username must be at most {USERNAME_MAX_LEN} characters")]
    UsernameTooLong,
    /// The password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login name.
///
/// # Examples
/// ```
/// use workouttracker::domain::Username;
///
/// let name = Username::new("  ada ").expect("valid username");
/// assert_eq!(name.as_ref(), "ada");
/// assert!(Username::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Trim and validate a raw username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LoginValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX_LEN {
            return Err(LoginValidationError::UsernameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credentials submitted through the login form.
///
/// The password is wiped from memory when the value is dropped.
pub struct LoginCredentials {
    username: Username,
    password: String,
}

impl LoginCredentials {
    /// Validate raw form fields.
    ///
    /// # Examples
    /// ```
    /// use workouttracker::domain::{LoginCredentials, LoginValidationError};
    ///
    /// let creds = LoginCredentials::try_from_parts("ada", "secret").expect("valid");
    /// assert_eq!(creds.username().as_ref(), "ada");
    /// assert_eq!(
    ///     LoginCredentials::try_from_parts("ada", "").err(),
    ///     Some(LoginValidationError::EmptyPassword)
    /// );
    /// ```
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: password.to_owned(),
        })
    }

    /// Submitted username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Submitted plaintext password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Drop for LoginCredentials {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Authenticated identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    username: Username,
}

impl Principal {
    /// Wrap a verified username.
    pub fn new(username: Username) -> Self {
        Self { username }
    }

    /// Name the principal authenticated with.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

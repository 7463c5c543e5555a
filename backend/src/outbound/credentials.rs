//! Users-file backed [`CredentialVerifier`].
//!
//! Accounts are loaded once at startup from a JSON array of
//! `{"username", "passwordHash"}` records, where each hash is an Argon2 PHC
//! string produced by [`hash_password`] (or the `hash-password` binary).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::ports::{AuthenticationError, CredentialVerifier};
use crate::domain::{LoginCredentials, LoginValidationError, Principal, Username};

/// One account in the users file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserRecord {
    /// Login name.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Errors raised while loading accounts.
#[derive(Debug, thiserror::Error)]
pub enum UsersFileError {
    /// The users file could not be read.
    #[error("failed to read users file at {path}: {source}")]
    Io {
        /// File location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The users file is not a JSON array of user records.
    #[error("failed to parse users file at {path}: {source}")]
    Parse {
        /// File location.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// A record carries a username the login form would reject.
    #[error("invalid username {username:?} in users file: {source}")]
    InvalidUsername {
        /// Username as written in the file.
        username: String,
        /// Validation failure.
        #[source]
        source: LoginValidationError,
    },
    /// Two records share a username.
    #[error("duplicate username {0:?} in users file")]
    DuplicateUsername(String),
    /// The decoy hash for unknown usernames could not be generated.
    #[error(transparent)]
    Decoy(#[from] PasswordHashError),
}

/// Failure to produce a password hash.
#[derive(Debug, thiserror::Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordHashError(password_hash::Error);

/// Hash `password` as an Argon2id PHC string with a random salt.
///
/// # Examples
///
/// ```
/// use workouttracker::outbound::credentials::hash_password;
///
/// let phc = hash_password("correct horse").expect("hash");
/// assert!(phc.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordHashError)
}

/// Verifies credentials against accounts held in memory.
///
/// Unknown usernames are checked against a decoy hash of a random secret, so
/// they cost the same Argon2 work as a wrong password for a known user.
#[derive(Debug, Clone)]
pub struct InMemoryCredentialVerifier {
    hashes: HashMap<Username, String>,
    decoy: String,
}

impl InMemoryCredentialVerifier {
    /// Index `records` by username, rejecting invalid or duplicate names.
    pub fn new(records: Vec<UserRecord>) -> Result<Self, UsersFileError> {
        let decoy = hash_password(&Uuid::new_v4().to_string())?;
        let mut hashes = HashMap::with_capacity(records.len());
        for UserRecord {
            username,
            password_hash,
        } in records
        {
            let name = Username::new(&username).map_err(|source| {
                UsersFileError::InvalidUsername {
                    username: username.clone(),
                    source,
                }
            })?;
            if hashes.insert(name, password_hash).is_some() {
                return Err(UsersFileError::DuplicateUsername(username));
            }
        }
        Ok(Self { hashes, decoy })
    }

    /// Load accounts from a JSON users file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, UsersFileError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| UsersFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<UserRecord> =
            serde_json::from_str(&raw).map_err(|source| UsersFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(records)
    }

    /// Number of loaded accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether no accounts were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

fn verify(stored: &str, password: &str) -> Result<(), AuthenticationError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| AuthenticationError::Unavailable(format!("stored hash unusable: {err}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => Err(AuthenticationError::BadCredentials),
        Err(err) => Err(AuthenticationError::Unavailable(format!(
            "password verification failed: {err}"
        ))),
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentialVerifier {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Principal, AuthenticationError> {
        let known = self.hashes.get(credentials.username());
        let is_known = known.is_some();
        let stored = known.unwrap_or(&self.decoy).clone();
        let mut password = credentials.password().to_owned();

        // Argon2 is CPU bound; run it on the blocking pool.
        let outcome = tokio::task::spawn_blocking(move || {
            let result = verify(&stored, &password);
            password.zeroize();
            result
        })
        .await
        .map_err(|err| AuthenticationError::Unavailable(format!("verifier task failed: {err}")))?;

        match outcome {
            Ok(()) if is_known => Ok(Principal::new(credentials.username().clone())),
            Ok(()) => Err(AuthenticationError::BadCredentials),
            Err(err) => Err(err),
        }
    }
}

//! Account use-case service: registration and login.
//!
//! # Responsibility
//! - Validate and register new users with argon2 password hashes.
//! - Verify credentials and produce the session identity for a login.
//!
//! # Invariants
//! - Plain-text passwords are never persisted or logged.
//! - Unknown usernames and wrong passwords fail identically.

use crate::model::identity::SessionIdentity;
use crate::model::user::{validate_username, User, UserId};
use crate::model::ValidationError;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::{info, warn};

/// Service error for account use-cases.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User {0} is already registered.")]
    UsernameTaken(String),
    #[error("Incorrect username or password.")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UniqueConstraintViolation { value, .. } => Self::UsernameTaken(value),
            other => Self::Repo(other),
        }
    }
}

/// Account service facade over a user repository.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user. Duplicate usernames fail with `UsernameTaken`.
    pub fn register(&self, username: &str, password: &str) -> Result<User, AccountError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let hashed = hash_password(password)?;
        let user = self.repo.create_user(username, &hashed)?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Verifies credentials and returns the identity to attach to the session.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionIdentity, AccountError> {
        let Some(user) = self.repo.get_user_by_username(username)? else {
            warn!("event=user_login module=service status=denied reason=unknown_user");
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password(password, &user.hashed_password)? {
            warn!(
                "event=user_login module=service status=denied reason=bad_password user_id={}",
                user.id
            );
            return Err(AccountError::InvalidCredentials);
        }

        info!("event=user_login module=service status=ok user_id={}", user.id);
        Ok(SessionIdentity::from(&user))
    }

    /// Re-resolves a session's user; `None` once the account no longer exists.
    pub fn find_user(&self, id: UserId) -> Result<Option<User>, AccountError> {
        Ok(self.repo.get_user(id)?)
    }
}

/// Hashes a password into a PHC string using argon2 defaults.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AccountError::Hashing(err.to_string()))
}

/// Checks a password against a stored PHC string.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AccountError> {
    let parsed =
        PasswordHash::new(hashed_password).map_err(|err| AccountError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

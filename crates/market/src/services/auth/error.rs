//! Authentication error types.

use thiserror::Error;

use crate::error::ErrorKind;
use crate::validation::ValidationError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already registered.
    #[error("email already registered")]
    DuplicateEmail,

    /// Username already taken.
    #[error("username already taken")]
    DuplicateUsername,

    /// No user is signed in.
    #[error("not signed in")]
    Unauthenticated,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Email, username, or password rejected.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// The taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::DuplicateEmail => ErrorKind::DuplicateEmail,
            Self::DuplicateUsername => ErrorKind::DuplicateUsername,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::UserNotFound => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::PasswordHash => ErrorKind::Internal,
        }
    }
}

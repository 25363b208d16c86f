//! Unified error handling for marketplace operations.
//!
//! Services return [`MarketError`]. Front ends map it to a message with
//! [`MarketError::user_message`] and branch on [`MarketError::kind`] rather
//! than matching nested variants. Storage failures never appear here: the
//! persistence adapter swallows them.

use thiserror::Error;

use crate::services::auth::AuthError;
use crate::validation::ValidationError;

/// Error kinds a front end distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An id did not resolve.
    NotFound,
    /// Login email/password mismatch.
    InvalidCredentials,
    /// Email already registered.
    DuplicateEmail,
    /// Username already taken.
    DuplicateUsername,
    /// The action needs a signed-in user.
    Unauthenticated,
    /// Input broke a validation rule.
    InvalidInput,
    /// The request conflicts with current state (item sold, empty cart).
    Conflict,
    /// Unexpected failure.
    Internal,
}

/// Application-level error type for marketplace services.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type (`product`, `user`, ...).
        entity: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// Product has already been sold.
    #[error("product is no longer available: {0}")]
    ProductUnavailable(String),

    /// Checkout with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Input rejected.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl MarketError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// The taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ProductUnavailable(_) | Self::EmptyCart => ErrorKind::Conflict,
            Self::Auth(err) => err.kind(),
            Self::Validation(_) => ErrorKind::InvalidInput,
        }
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("That {entity} could not be found"),
            Self::ProductUnavailable(_) => "This item has already been sold".to_owned(),
            Self::EmptyCart => "Your cart is empty".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_owned(),
                AuthError::DuplicateEmail => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::DuplicateUsername => "This username is already taken".to_owned(),
                AuthError::Unauthenticated => "Please sign in to continue".to_owned(),
                AuthError::UserNotFound => "Account not found".to_owned(),
                AuthError::InvalidInput(e) => e.to_string(),
                AuthError::PasswordHash => "Authentication error".to_owned(),
            },
            Self::Validation(e) => e.to_string(),
        }
    }
}

/// Result type alias for `MarketError`.
pub type Result<T> = std::result::Result<T, MarketError>;

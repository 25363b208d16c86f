//! Command implementations.
//!
//! Each command opens its services from the shared [`Marketplace`] and prints
//! through [`crate::output`].

pub mod account;
pub mod cart;
pub mod orders;
pub mod products;
pub mod seed;

use secondhand_market::models::AuthSession;
use secondhand_market::{MarketError, Marketplace};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A marketplace operation was rejected.
    #[error("{}", .0.user_message())]
    Market(#[from] MarketError),

    /// A command-line value could not be parsed.
    #[error("Invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },

    /// The signed-in user does not own the listing.
    #[error("You can only change your own listings")]
    NotOwner,

    /// Seed catalogue could not be read.
    #[error("Could not read seed file: {0}")]
    SeedFile(#[from] std::io::Error),

    /// Seed catalogue is malformed.
    #[error("Invalid seed catalogue: {0}")]
    SeedFormat(#[from] serde_yaml::Error),
}

impl From<secondhand_market::services::AuthError> for CommandError {
    fn from(err: secondhand_market::services::AuthError) -> Self {
        Self::Market(err.into())
    }
}

impl From<secondhand_market::validation::ValidationError> for CommandError {
    fn from(err: secondhand_market::validation::ValidationError) -> Self {
        Self::Market(err.into())
    }
}

/// The signed-in session, or `Unauthenticated`.
fn signed_in(market: &Marketplace) -> Result<AuthSession, CommandError> {
    Ok(market.session().require_session()?)
}

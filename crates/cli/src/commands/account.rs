//! Account commands: register, login, logout, profile.

use secrecy::{ExposeSecret, SecretString};

use secondhand_market::Marketplace;
use secondhand_market::models::ProfileUpdate;

use super::CommandError;
use crate::output;

/// Create an account and sign in.
pub fn register(
    market: &Marketplace,
    email: &str,
    username: &str,
    password: &SecretString,
) -> Result<(), CommandError> {
    let session = market
        .session()
        .register(email, username, password.expose_secret())?;
    output::status(&format!("Welcome, {}!", session.username));
    Ok(())
}

/// Sign in.
pub fn login(market: &Marketplace, email: &str, password: &SecretString) -> Result<(), CommandError> {
    let session = market.session().login(email, password.expose_secret())?;
    output::status(&format!("Signed in as {}", session.username));
    Ok(())
}

/// Sign out.
pub fn logout(market: &Marketplace) {
    market.session().logout();
    output::status("Signed out");
}

/// Show the signed-in user.
pub fn whoami(market: &Marketplace) {
    match market.session().current_user() {
        Some(session) => output::session(&session),
        None => output::status("Not signed in"),
    }
}

/// Edit the signed-in user's profile.
pub fn update_profile(
    market: &Marketplace,
    email: Option<String>,
    username: Option<String>,
    bio: Option<String>,
    avatar: Option<String>,
) -> Result<(), CommandError> {
    let update = ProfileUpdate {
        email,
        username,
        bio,
        avatar,
    };
    if update.is_empty() {
        return Err(CommandError::InvalidArgument {
            field: "profile",
            reason: "nothing to change".to_owned(),
        });
    }

    let session = market.session().update_profile(update)?;
    output::session(&session);
    Ok(())
}

/// Change the signed-in user's password.
pub fn change_password(
    market: &Marketplace,
    current: &SecretString,
    new: &SecretString,
) -> Result<(), CommandError> {
    market
        .session()
        .change_password(current.expose_secret(), new.expose_secret())?;
    output::status("Password changed");
    Ok(())
}

//! Authentication service.
//!
//! Accounts live in the users collection. The signed-in identity is an
//! [`AuthSession`] projection stored under
//! [`keys::CURRENT_USER`] together with an opaque token under
//! [`keys::AUTH_TOKEN`]; the two are always written and cleared together, and
//! a caller is authenticated only while both are present.

mod error;
mod password;

pub use error::AuthError;
pub use password::PasswordHasher;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use secondhand_core::UserId;

use crate::config::{ConfigError, MarketConfig};
use crate::db::UserRepository;
use crate::models::session::AuthSession;
use crate::models::user::{ProfileUpdate, User};
use crate::store::{Storage, keys};
use crate::validation;

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Settings shared by every auth operation.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    hasher: PasswordHasher,
    avatar_url_template: String,
}

impl AuthSettings {
    /// Build settings from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHashing` if the hashing parameters are invalid.
    pub fn from_config(config: &MarketConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            hasher: PasswordHasher::new(config.hashing.params()?),
            avatar_url_template: config.avatar_url_template.clone(),
        })
    }

    fn avatar_url_for(&self, username: &str) -> String {
        self.avatar_url_template.replace("{username}", username)
    }
}

/// Authentication service.
///
/// Handles registration, login, logout, and profile updates.
pub struct AuthService<'a> {
    storage: &'a Storage,
    users: UserRepository<'a>,
    settings: &'a AuthSettings,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(storage: &'a Storage, settings: &'a AuthSettings) -> Self {
        Self {
            storage,
            users: UserRepository::new(storage),
            settings,
        }
    }

    /// Sign in with email and password.
    ///
    /// A failed attempt leaves any existing session untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account has this email or
    /// the password does not match.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = email.trim();
        let Some(user) = self
            .users
            .all()
            .into_iter()
            .find(|u| u.email.as_str() == email)
        else {
            // Unknown emails still pay for a hash
            return Err(self.settings.hasher.reject_unknown(password));
        };

        self.settings.hasher.verify(password, &user.password_hash)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(self.start_session(&user))
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` if the email, username, or password is malformed.
    /// Returns `AuthError::DuplicateEmail` or `AuthError::DuplicateUsername` if taken.
    #[instrument(skip(self, password))]
    pub fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = validation::parse_email(email)?;
        let username = validation::normalize_username(username)?;
        validation::check_password(password)?;

        let users = self.users.all();
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail);
        }
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = self.settings.hasher.hash(password)?;
        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            avatar: Some(self.settings.avatar_url_for(&username)),
            email,
            username,
            password_hash,
            bio: None,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(self.start_session(&user))
    }

    /// Sign out. Clearing an absent session is a no-op.
    pub fn logout(&self) {
        self.storage.remove(keys::CURRENT_USER);
        self.storage.remove(keys::AUTH_TOKEN);
    }

    /// The stored session projection, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<AuthSession> {
        self.storage.read(keys::CURRENT_USER, None)
    }

    /// The stored session token, if any.
    #[must_use]
    pub fn session_token(&self) -> Option<SecretString> {
        self.storage
            .read::<Option<String>>(keys::AUTH_TOKEN, None)
            .map(SecretString::from)
    }

    /// Whether both the token and the session projection are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session_token().is_some() && self.current_session().is_some()
    }

    /// Apply a profile change to `user_id`.
    ///
    /// Email and username stay unique across other accounts. When `user_id` is
    /// the signed-in user, the stored session projection is refreshed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account does not exist.
    /// Returns `AuthError::InvalidInput` if a new email or username is malformed.
    /// Returns `AuthError::DuplicateEmail` or `AuthError::DuplicateUsername` on conflict.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<AuthSession, AuthError> {
        let users = self.users.all();
        let mut user = users
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
            .ok_or(AuthError::UserNotFound)?;

        if let Some(email) = update.email {
            let email = validation::parse_email(&email)?;
            if users.iter().any(|u| &u.id != user_id && u.email == email) {
                return Err(AuthError::DuplicateEmail);
            }
            user.email = email;
        }
        if let Some(username) = update.username {
            let username = validation::normalize_username(&username)?;
            if users
                .iter()
                .any(|u| &u.id != user_id && u.username == username)
            {
                return Err(AuthError::DuplicateUsername);
            }
            user.username = username;
        }
        if let Some(bio) = update.bio {
            user.bio = non_empty(bio);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = non_empty(avatar);
        }
        user.updated_at = Utc::now();

        if !self.users.replace(user.clone()) {
            return Err(AuthError::UserNotFound);
        }

        let session = user.to_session();
        if self
            .current_session()
            .is_some_and(|current| &current.id == user_id)
        {
            self.storage.write(keys::CURRENT_USER, &session);
        }

        tracing::info!("Profile updated");
        Ok(session)
    }

    /// Change a password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account does not exist.
    /// Returns `AuthError::InvalidCredentials` if `current` is wrong.
    /// Returns `AuthError::InvalidInput` if `new` is too short.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub fn change_password(
        &self,
        user_id: &UserId,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        let mut user = self
            .users
            .get_by_id(user_id)
            .ok_or(AuthError::UserNotFound)?;

        self.settings.hasher.verify(current, &user.password_hash)?;
        validation::check_password(new)?;

        user.password_hash = self.settings.hasher.hash(new)?;
        user.updated_at = Utc::now();
        self.users.replace(user);

        tracing::info!("Password changed");
        Ok(())
    }

    /// Persist the session projection and a fresh token for `user`.
    fn start_session(&self, user: &User) -> AuthSession {
        let session = user.to_session();
        let token = generate_token();
        self.storage.write(keys::CURRENT_USER, &session);
        self.storage.write(keys::AUTH_TOKEN, token.expose_secret());
        session
    }
}

/// Random URL-safe session token.
fn generate_token() -> SecretString {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    SecretString::from(URL_SAFE_NO_PAD.encode(bytes))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

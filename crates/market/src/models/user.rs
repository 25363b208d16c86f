//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use secondhand_core::{Email, UserId};

use super::session::AuthSession;

/// A registered marketplace account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email, unique across users.
    pub email: Email,
    /// Public display name, unique across users.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Free-form profile text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the profile was last changed.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public summary used when joining onto listings and purchases.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Password-free projection stored as the signed-in identity.
    #[must_use]
    pub fn to_session(&self) -> AuthSession {
        AuthSession {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            bio: self.bio.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }
}

/// Seller or buyer details attached to other records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub avatar: Option<String>,
}

impl UserSummary {
    /// Username shown when the referenced account no longer exists.
    pub const UNKNOWN_USERNAME: &'static str = "Unknown User";

    /// Placeholder for a missing account.
    #[must_use]
    pub fn unknown(id: UserId) -> Self {
        Self {
            id,
            username: Self::UNKNOWN_USERNAME.to_owned(),
            avatar: None,
        }
    }

    /// Whether this is the missing-account placeholder.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.username == Self::UNKNOWN_USERNAME && self.avatar.is_none()
    }
}

/// Partial profile change. `None` leaves a field untouched.
///
/// An empty `bio` or `avatar` clears the field.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.bio.is_none()
            && self.avatar.is_none()
    }
}

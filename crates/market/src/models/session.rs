//! Session-related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use secondhand_core::{Email, UserId};

/// The signed-in identity.
///
/// A projection of [`User`](super::User) without the password hash, stored
/// under [`keys::CURRENT_USER`](crate::store::keys::CURRENT_USER). It can lag
/// behind the users collection until the next login or profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// User's ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

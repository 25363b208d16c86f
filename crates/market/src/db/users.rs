//! User repository.

use std::collections::HashMap;

use secondhand_core::{Email, UserId};

use super::Collection;
use crate::models::user::{User, UserSummary};
use crate::store::{Storage, keys};

/// Repository for stored users.
pub struct UserRepository<'a> {
    users: Collection<'a, User>,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            users: Collection::new(storage, keys::USERS),
        }
    }

    /// All users in registration order.
    #[must_use]
    pub fn all(&self) -> Vec<User> {
        self.users.load()
    }

    /// Get a user by ID.
    #[must_use]
    pub fn get_by_id(&self, id: &UserId) -> Option<User> {
        self.all().into_iter().find(|u| &u.id == id)
    }

    /// Get a user by exact email.
    #[must_use]
    pub fn get_by_email(&self, email: &Email) -> Option<User> {
        self.all().into_iter().find(|u| &u.email == email)
    }

    /// Append a user.
    pub fn insert(&self, user: User) {
        self.users.update(|users| users.push(user));
    }

    /// Replace the stored user with the same ID.
    ///
    /// Returns `false` if no such user exists.
    pub fn replace(&self, user: User) -> bool {
        let mut users = self.all();
        let Some(slot) = users.iter_mut().find(|u| u.id == user.id) else {
            return false;
        };
        *slot = user;
        self.users.save(&users);
        true
    }

    /// Whether any account exists.
    #[must_use]
    pub fn has_users(&self) -> bool {
        !self.all().is_empty()
    }

    /// Summaries of every user, keyed by ID, for joins.
    #[must_use]
    pub fn summaries(&self) -> HashMap<UserId, UserSummary> {
        self.all()
            .iter()
            .map(|user| (user.id.clone(), user.summary()))
            .collect()
    }
}

/// Seller summary for `id`, or the unknown-user placeholder.
pub fn summary_or_unknown(summaries: &HashMap<UserId, UserSummary>, id: &UserId) -> UserSummary {
    summaries
        .get(id)
        .cloned()
        .unwrap_or_else(|| UserSummary::unknown(id.clone()))
}

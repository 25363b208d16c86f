//! Cart repository.

use super::Collection;
use crate::models::cart::CartItem;
use crate::store::{Storage, keys};

/// Repository for cart items of all users.
pub struct CartRepository<'a> {
    items: Collection<'a, CartItem>,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            items: Collection::new(storage, keys::CART),
        }
    }

    /// Every stored cart item.
    #[must_use]
    pub fn all(&self) -> Vec<CartItem> {
        self.items.load()
    }

    /// Replace the stored cart collection.
    pub fn save(&self, items: &[CartItem]) {
        self.items.save(items);
    }

    /// Load, modify, and save the cart collection.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<CartItem>) -> R) -> R {
        self.items.update(f)
    }

    /// Remove every item matching `predicate`. Returns the number removed.
    ///
    /// Nothing is written when no item matches.
    pub fn remove_where(&self, predicate: impl Fn(&CartItem) -> bool) -> usize {
        let mut items = self.all();
        let before = items.len();
        items.retain(|item| !predicate(item));
        let removed = before - items.len();
        if removed > 0 {
            self.items.save(&items);
        }
        removed
    }
}

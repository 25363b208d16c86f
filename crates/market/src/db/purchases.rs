//! Purchase repository.

use super::Collection;
use crate::models::purchase::Purchase;
use crate::store::{Storage, keys};

/// Repository for purchase records. Records are append-only.
pub struct PurchaseRepository<'a> {
    purchases: Collection<'a, Purchase>,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new purchase repository.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            purchases: Collection::new(storage, keys::PURCHASES),
        }
    }

    /// Every stored purchase.
    #[must_use]
    pub fn all(&self) -> Vec<Purchase> {
        self.purchases.load()
    }

    /// Append a purchase.
    pub fn insert(&self, purchase: Purchase) {
        self.purchases.update(|purchases| purchases.push(purchase));
    }
}

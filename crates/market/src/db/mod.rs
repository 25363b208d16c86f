//! Typed repositories over the stored collections.
//!
//! # Collections
//!
//! - `users` - Accounts ([`UserRepository`])
//! - `products` - Listings ([`ProductRepository`])
//! - `cart` - Cart items for every user ([`CartRepository`])
//! - `purchases` - Purchase records ([`PurchaseRepository`])
//!
//! Each repository loads the whole collection from [`Storage`] and writes the
//! whole collection back. Lookups are linear scans.

pub mod cart;
pub mod products;
pub mod purchases;
pub mod users;

pub use cart::CartRepository;
pub use products::ProductRepository;
pub use purchases::PurchaseRepository;
pub use users::UserRepository;

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::Storage;

/// A JSON array of `T` stored under one key.
#[derive(Debug)]
pub struct Collection<'a, T> {
    storage: &'a Storage,
    key: &'static str,
    _marker: PhantomData<T>,
}

impl<'a, T> Collection<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a collection to `key`.
    #[must_use]
    pub const fn new(storage: &'a Storage, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    /// Load every record. Missing or unreadable data yields an empty list.
    #[must_use]
    pub fn load(&self) -> Vec<T> {
        self.storage.read(self.key, Vec::new())
    }

    /// Replace the stored collection.
    pub fn save(&self, items: &[T]) {
        self.storage.write(self.key, items);
    }

    /// Load, let `f` modify the records, and save them back.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut items = self.load();
        let result = f(&mut items);
        self.save(&items);
        result
    }
}

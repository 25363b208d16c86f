//! Product repository.

use secondhand_core::{ProductId, UserId};

use super::Collection;
use crate::models::product::Product;
use crate::store::{Storage, keys};

/// Repository for stored listings.
pub struct ProductRepository<'a> {
    products: Collection<'a, Product>,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            products: Collection::new(storage, keys::PRODUCTS),
        }
    }

    /// All listings in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Product> {
        self.products.load()
    }

    /// Get a listing by ID.
    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<Product> {
        self.all().into_iter().find(|p| &p.id == id)
    }

    /// Listings owned by `seller_id`.
    #[must_use]
    pub fn by_seller(&self, seller_id: &UserId) -> Vec<Product> {
        self.all()
            .into_iter()
            .filter(|p| &p.seller_id == seller_id)
            .collect()
    }

    /// Append a listing.
    pub fn insert(&self, product: Product) {
        self.products.update(|products| products.push(product));
    }

    /// Apply `f` to the listing with `id` and save.
    ///
    /// Returns the modified listing, or `None` if it does not exist. Nothing
    /// is written when the listing is missing.
    pub fn modify(&self, id: &ProductId, f: impl FnOnce(&mut Product)) -> Option<Product> {
        let mut products = self.all();
        let product = products.iter_mut().find(|p| &p.id == id)?;
        f(product);
        let updated = product.clone();
        self.products.save(&products);
        Some(updated)
    }

    /// Remove the listing with `id`. Returns whether it existed.
    pub fn delete(&self, id: &ProductId) -> bool {
        self.products.update(|products| {
            let before = products.len();
            products.retain(|p| &p.id != id);
            products.len() != before
        })
    }
}

//! Shopping cart service.
//!
//! Cart rows reference listings by ID only. Rows whose listing has since been
//! deleted stay in storage but are never returned or counted.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use secondhand_core::{CartItemId, ProductId, UserId};

use crate::db::CartRepository;
use crate::models::cart::{CartItem, CartItemWithProduct};
use crate::services::products::ProductService;
use crate::store::Storage;

/// Per-user cart operations.
pub struct CartService<'a> {
    items: CartRepository<'a>,
    products: ProductService<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            items: CartRepository::new(storage),
            products: ProductService::new(storage),
        }
    }

    /// The user's cart rows joined with their listings, in insertion order.
    #[must_use]
    pub fn list_for_user(&self, user_id: &UserId) -> Vec<CartItemWithProduct> {
        let products = self.products.lookup_all();
        self.items
            .all()
            .into_iter()
            .filter(|item| &item.user_id == user_id)
            .filter_map(|item| {
                let Some(product) = products.get(&item.product_id).cloned() else {
                    tracing::debug!(item_id = %item.id, "Skipping cart row for missing listing");
                    return None;
                };
                Some(CartItemWithProduct { item, product })
            })
            .collect()
    }

    /// The user's stored rows, including rows whose listing is gone.
    #[must_use]
    pub fn items_for_user(&self, user_id: &UserId) -> Vec<CartItem> {
        self.items
            .all()
            .into_iter()
            .filter(|item| &item.user_id == user_id)
            .collect()
    }

    /// Add `quantity` of a listing, merging into an existing row.
    ///
    /// Quantities are not clamped here; see
    /// [`check_quantity`](crate::validation::check_quantity).
    #[instrument(skip_all, fields(user_id = %user_id, product_id = %product_id, quantity = quantity))]
    pub fn add_item(&self, user_id: &UserId, product_id: &ProductId, quantity: u32) -> CartItem {
        self.items.update(|items| {
            if let Some(existing) = items
                .iter_mut()
                .find(|i| &i.user_id == user_id && &i.product_id == product_id)
            {
                existing.quantity = existing.quantity.saturating_add(quantity);
                tracing::info!(quantity = existing.quantity, "Cart row merged");
                return existing.clone();
            }

            let item = CartItem {
                id: CartItemId::generate(),
                user_id: user_id.clone(),
                product_id: product_id.clone(),
                quantity,
                added_at: Utc::now(),
            };
            items.push(item.clone());
            tracing::info!(item_id = %item.id, "Cart row added");
            item
        })
    }

    /// Overwrite a row's quantity. Zero removes the row.
    pub fn set_quantity(&self, item_id: &CartItemId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(item_id);
            return;
        }

        let mut items = self.items.all();
        let Some(item) = items.iter_mut().find(|i| &i.id == item_id) else {
            return;
        };
        item.quantity = quantity;
        self.items.save(&items);
    }

    /// Remove a row by ID.
    pub fn remove_item(&self, item_id: &CartItemId) {
        if self.items.remove_where(|i| &i.id == item_id) > 0 {
            tracing::info!(item_id = %item_id, "Cart row removed");
        }
    }

    /// Remove the user's row for a listing.
    pub fn remove_product(&self, user_id: &UserId, product_id: &ProductId) {
        self.items
            .remove_where(|i| &i.user_id == user_id && &i.product_id == product_id);
    }

    /// Empty the user's cart.
    pub fn clear_for_user(&self, user_id: &UserId) {
        let removed = self.items.remove_where(|i| &i.user_id == user_id);
        tracing::info!(user_id = %user_id, removed, "Cart cleared");
    }

    /// Sum of current price times quantity over the user's listed rows,
    /// saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn total_for_user(&self, user_id: &UserId) -> Decimal {
        self.list_for_user(user_id)
            .iter()
            .map(CartItemWithProduct::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total quantity over the user's listed rows.
    #[must_use]
    pub fn count_for_user(&self, user_id: &UserId) -> u32 {
        self.list_for_user(user_id)
            .iter()
            .fold(0, |count, entry| count.saturating_add(entry.item.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use secondhand_core::ProductCategory;

    use super::*;
    use crate::models::product::NewProduct;
    use crate::store::keys;

    fn listing(storage: &Storage, price: &str) -> ProductId {
        ProductService::new(storage)
            .create(
                &UserId::new("seller"),
                NewProduct {
                    title: "Bookshelf".to_owned(),
                    description: "Pine".to_owned(),
                    price: price.parse().unwrap(),
                    category: ProductCategory::HomeGarden,
                    image_url: "https://images.example.com/shelf.jpg".to_owned(),
                },
            )
            .id
    }

    #[test]
    fn test_add_merges_quantities() {
        let storage = Storage::in_memory();
        let product = listing(&storage, "10.00");
        let user = UserId::new("buyer");
        let cart = CartService::new(&storage);

        let first = cart.add_item(&user, &product, 2);
        let merged = cart.add_item(&user, &product, 3);
        assert_eq!(first.id, merged.id);
        assert_eq!(merged.quantity, 5);

        let items = cart.list_for_user(&user);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.quantity, 5);
    }

    #[test]
    fn test_rows_are_per_user() {
        let storage = Storage::in_memory();
        let product = listing(&storage, "10.00");
        let cart = CartService::new(&storage);

        cart.add_item(&UserId::new("ann"), &product, 1);
        cart.add_item(&UserId::new("bob"), &product, 4);

        assert_eq!(cart.count_for_user(&UserId::new("ann")), 1);
        assert_eq!(cart.count_for_user(&UserId::new("bob")), 4);
        assert_eq!(cart.count_for_user(&UserId::new("cat")), 0);
    }

    #[test]
    fn test_set_quantity() {
        let storage = Storage::in_memory();
        let product = listing(&storage, "10.00");
        let user = UserId::new("buyer");
        let cart = CartService::new(&storage);
        let item = cart.add_item(&user, &product, 1);

        cart.set_quantity(&item.id, 7);
        assert_eq!(cart.list_for_user(&user)[0].item.quantity, 7);

        cart.set_quantity(&item.id, 0);
        assert!(cart.list_for_user(&user).is_empty());

        // Unknown row is ignored
        cart.set_quantity(&CartItemId::new("missing"), 3);
        assert!(cart.list_for_user(&user).is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let storage = Storage::in_memory();
        let desk = listing(&storage, "10.00");
        let lamp = listing(&storage, "4.00");
        let user = UserId::new("buyer");
        let other = UserId::new("other");
        let cart = CartService::new(&storage);

        let desk_item = cart.add_item(&user, &desk, 1);
        cart.add_item(&user, &lamp, 1);
        cart.add_item(&other, &lamp, 1);

        cart.remove_item(&desk_item.id);
        assert_eq!(cart.list_for_user(&user).len(), 1);

        cart.remove_product(&user, &lamp);
        assert!(cart.list_for_user(&user).is_empty());

        cart.add_item(&user, &desk, 1);
        cart.clear_for_user(&user);
        assert!(cart.list_for_user(&user).is_empty());
        assert_eq!(cart.list_for_user(&other).len(), 1);
    }

    #[test]
    fn test_totals() {
        let storage = Storage::in_memory();
        let desk = listing(&storage, "10.00");
        let lamp = listing(&storage, "4.25");
        let user = UserId::new("buyer");
        let cart = CartService::new(&storage);

        cart.add_item(&user, &desk, 2);
        cart.add_item(&user, &lamp, 1);

        assert_eq!(cart.total_for_user(&user), Decimal::new(2425, 2));
        assert_eq!(cart.count_for_user(&user), 3);
    }

    #[test]
    fn test_total_saturates() {
        let storage = Storage::in_memory();
        let bar = listing(&storage, "50000000000000000000000000000");
        let coin = listing(&storage, "50000000000000000000000000000");
        let user = UserId::new("buyer");
        let cart = CartService::new(&storage);

        cart.add_item(&user, &bar, u32::MAX);
        cart.add_item(&user, &coin, 1);

        assert_eq!(cart.total_for_user(&user), Decimal::MAX);
    }

    #[test]
    fn test_duplicate_rows_both_listed() {
        let storage = Storage::in_memory();
        let desk = listing(&storage, "10.00");
        let user = UserId::new("buyer");
        let cart = CartService::new(&storage);
        let first = cart.add_item(&user, &desk, 1);

        // Two rows for one listing can only come from edited storage
        let mut items = cart.items_for_user(&user);
        items.push(CartItem {
            id: CartItemId::new("copied-row"),
            quantity: 2,
            ..first
        });
        storage.write(keys::CART, &items);

        let listed = cart.list_for_user(&user);
        assert_eq!(listed.len(), 2);
        assert_eq!(cart.count_for_user(&user), 3);
        assert_eq!(cart.total_for_user(&user), Decimal::new(3000, 2));
    }

    #[test]
    fn test_deleted_listing_dropped_from_cart() {
        let storage = Storage::in_memory();
        let desk = listing(&storage, "10.00");
        let lamp = listing(&storage, "4.00");
        let user = UserId::new("buyer");
        let cart = CartService::new(&storage);

        cart.add_item(&user, &desk, 1);
        cart.add_item(&user, &lamp, 2);
        ProductService::new(&storage).delete(&desk);

        let items = cart.list_for_user(&user);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.product.id, lamp);
        assert_eq!(cart.total_for_user(&user), Decimal::new(800, 2));

        // The dangling row is still stored
        let raw: Vec<CartItem> = storage.read(keys::CART, Vec::new());
        assert_eq!(raw.len(), 2);
    }
}

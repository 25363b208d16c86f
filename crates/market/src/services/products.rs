//! Product listing service.
//!
//! Listings are joined with their seller's summary on the way out. A listing
//! whose seller no longer exists is shown with the "Unknown User" placeholder
//! instead of failing.

use std::collections::HashMap;

use chrono::Utc;
use tracing::instrument;

use secondhand_core::{ProductCategory, ProductId, UserId};

use crate::db::users::summary_or_unknown;
use crate::db::{ProductRepository, UserRepository};
use crate::error::{MarketError, Result};
use crate::models::product::{NewProduct, Product, ProductUpdate, ProductWithSeller};
use crate::store::Storage;

/// Listing CRUD, browsing, and search.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            products: ProductRepository::new(storage),
            users: UserRepository::new(storage),
        }
    }

    /// Available listings with sellers, newest first.
    #[must_use]
    pub fn list_available(&self) -> Vec<ProductWithSeller> {
        let mut products: Vec<Product> = self
            .products
            .all()
            .into_iter()
            .filter(|p| p.is_available)
            .collect();
        sort_newest_first(&mut products);
        self.with_sellers(products)
    }

    /// A single listing with its seller, regardless of availability.
    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<ProductWithSeller> {
        let product = self.products.get_by_id(id)?;
        self.with_sellers(vec![product]).pop()
    }

    /// Every listing of a seller, sold ones included, newest first.
    #[must_use]
    pub fn list_by_seller(&self, seller_id: &UserId) -> Vec<Product> {
        let mut products = self.products.by_seller(seller_id);
        sort_newest_first(&mut products);
        products
    }

    /// Create an available listing owned by `seller_id`.
    ///
    /// The listing is stored as given; see [`crate::validation`] for the
    /// checks front ends apply first.
    #[instrument(skip_all, fields(seller_id = %seller_id))]
    pub fn create(&self, seller_id: &UserId, new: NewProduct) -> Product {
        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            seller_id: seller_id.clone(),
            title: new.title,
            description: new.description,
            price: new.price,
            category: new.category,
            image_url: new.image_url,
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        self.products.insert(product.clone());

        tracing::info!(product_id = %product.id, "Listing created");
        product
    }

    /// Apply a partial edit and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::NotFound` if the listing does not exist.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product> {
        let product = self
            .products
            .modify(id, |product| {
                update.apply_to(product);
                product.updated_at = Utc::now();
            })
            .ok_or_else(|| MarketError::not_found("product", id))?;

        tracing::info!("Listing updated");
        Ok(product)
    }

    /// Remove a listing. Ownership is the caller's concern.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn delete(&self, id: &ProductId) {
        if self.products.delete(id) {
            tracing::info!("Listing deleted");
        }
    }

    /// Flag a listing as sold.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::NotFound` if the listing does not exist.
    pub fn mark_unavailable(&self, id: &ProductId) -> Result<Product> {
        self.update(
            id,
            ProductUpdate {
                is_available: Some(false),
                ..ProductUpdate::default()
            },
        )
    }

    /// Available listings whose title or description contains `text`
    /// (case-insensitive), optionally limited to one category.
    #[must_use]
    pub fn search(&self, text: &str, category: Option<ProductCategory>) -> Vec<ProductWithSeller> {
        let needle = text.trim().to_lowercase();
        self.list_available()
            .into_iter()
            .filter(|entry| entry.product.matches_text(&needle))
            .filter(|entry| category.is_none_or(|c| entry.product.category == c))
            .collect()
    }

    /// Every listing with its seller, keyed by ID, for joins.
    #[must_use]
    pub fn lookup_all(&self) -> HashMap<ProductId, ProductWithSeller> {
        self.with_sellers(self.products.all())
            .into_iter()
            .map(|entry| (entry.product.id.clone(), entry))
            .collect()
    }

    fn with_sellers(&self, products: Vec<Product>) -> Vec<ProductWithSeller> {
        let sellers = self.users.summaries();
        products
            .into_iter()
            .map(|product| ProductWithSeller {
                seller: summary_or_unknown(&sellers, &product.seller_id),
                product,
            })
            .collect()
    }
}

fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::user::{User, UserSummary};
    use crate::store::keys;

    fn seller(storage: &Storage, username: &str) -> UserId {
        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            email: format!("{username}@example.com").parse().unwrap(),
            username: username.to_owned(),
            password_hash: String::new(),
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        let id = user.id.clone();
        UserRepository::new(storage).insert(user);
        id
    }

    fn listing(title: &str, category: ProductCategory) -> NewProduct {
        NewProduct {
            title: title.to_owned(),
            description: format!("{title} in good condition"),
            price: "10.00".parse().unwrap(),
            category,
            image_url: "https://images.example.com/item.jpg".to_owned(),
        }
    }

    /// Shift a stored listing's creation time so ordering is deterministic.
    fn backdate(storage: &Storage, id: &ProductId, minutes: i64) {
        ProductRepository::new(storage).modify(id, |p| {
            p.created_at -= Duration::minutes(minutes);
        });
    }

    #[test]
    fn test_create_and_get() {
        let storage = Storage::in_memory();
        let seller_id = seller(&storage, "ann_sells");
        let service = ProductService::new(&storage);

        let product = service.create(&seller_id, listing("Road Bike", ProductCategory::SportsOutdoors));
        assert!(product.is_available);
        assert_eq!(product.created_at, product.updated_at);

        let found = service.get_by_id(&product.id).unwrap();
        assert_eq!(found.product, product);
        assert_eq!(found.seller.username, "ann_sells");

        assert!(service.get_by_id(&ProductId::new("missing")).is_none());
    }

    #[test]
    fn test_list_available_newest_first_and_filtered() {
        let storage = Storage::in_memory();
        let seller_id = seller(&storage, "ann_sells");
        let service = ProductService::new(&storage);

        let old = service.create(&seller_id, listing("Old Lamp", ProductCategory::HomeGarden));
        let new = service.create(&seller_id, listing("New Lamp", ProductCategory::HomeGarden));
        let sold = service.create(&seller_id, listing("Sold Lamp", ProductCategory::HomeGarden));
        backdate(&storage, &old.id, 10);
        service.mark_unavailable(&sold.id).unwrap();

        let listed = service.list_available();
        let ids: Vec<_> = listed.iter().map(|e| e.product.id.clone()).collect();
        assert_eq!(ids, vec![new.id, old.id]);
        assert!(listed.iter().all(|e| e.product.is_available));
    }

    #[test]
    fn test_missing_seller_uses_placeholder() {
        let storage = Storage::in_memory();
        let service = ProductService::new(&storage);

        let ghost = UserId::new("deleted-user");
        let product = service.create(&ghost, listing("Record Player", ProductCategory::Electronics));

        let found = service.get_by_id(&product.id).unwrap();
        assert_eq!(found.seller.username, UserSummary::UNKNOWN_USERNAME);
        assert_eq!(found.seller.id, ghost);
        assert!(found.seller.is_unknown());
    }

    #[test]
    fn test_list_by_seller_includes_sold() {
        let storage = Storage::in_memory();
        let ann = seller(&storage, "ann_sells");
        let bob = seller(&storage, "bob_sells");
        let service = ProductService::new(&storage);

        let first = service.create(&ann, listing("Desk", ProductCategory::HomeGarden));
        let second = service.create(&ann, listing("Chair", ProductCategory::HomeGarden));
        service.create(&bob, listing("Sofa", ProductCategory::HomeGarden));
        backdate(&storage, &first.id, 5);
        service.mark_unavailable(&first.id).unwrap();

        let mine = service.list_by_seller(&ann);
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id);
        assert!(!mine[1].is_available);
    }

    #[test]
    fn test_update_merges_fields() {
        let storage = Storage::in_memory();
        let seller_id = seller(&storage, "ann_sells");
        let service = ProductService::new(&storage);
        let product = service.create(&seller_id, listing("Desk", ProductCategory::HomeGarden));

        let updated = service
            .update(
                &product.id,
                ProductUpdate {
                    price: Some("7.50".parse().unwrap()),
                    ..ProductUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Desk");
        assert_eq!(updated.price.to_string(), "$7.50");
        assert_eq!(updated.seller_id, seller_id);
        assert!(updated.updated_at >= product.updated_at);

        let err = service
            .update(&ProductId::new("missing"), ProductUpdate::default())
            .unwrap_err();
        assert!(matches!(err, MarketError::NotFound { entity: "product", .. }));
    }

    #[test]
    fn test_delete() {
        let storage = Storage::in_memory();
        let seller_id = seller(&storage, "ann_sells");
        let service = ProductService::new(&storage);
        let product = service.create(&seller_id, listing("Desk", ProductCategory::HomeGarden));

        service.delete(&product.id);
        assert!(service.get_by_id(&product.id).is_none());
        // Deleting again is harmless
        service.delete(&product.id);
    }

    #[test]
    fn test_search() {
        let storage = Storage::in_memory();
        let seller_id = seller(&storage, "ann_sells");
        let service = ProductService::new(&storage);

        let jacket = service.create(
            &seller_id,
            listing("Vintage Leather Jacket", ProductCategory::Fashion),
        );
        service.create(&seller_id, listing("Garden Hose", ProductCategory::HomeGarden));
        let book = service.create(
            &seller_id,
            NewProduct {
                description: "A novel about a lost JACKET".to_owned(),
                ..listing("Paperback", ProductCategory::BooksMedia)
            },
        );

        let ids = |results: Vec<ProductWithSeller>| -> Vec<ProductId> {
            results.into_iter().map(|e| e.product.id).collect()
        };

        let found = ids(service.search("jacket", None));
        assert_eq!(found.len(), 2);
        assert!(found.contains(&jacket.id));
        assert!(found.contains(&book.id));

        let found = ids(service.search("JACKET", Some(ProductCategory::Fashion)));
        assert_eq!(found, vec![jacket.id]);

        assert!(service.search("jacket", Some(ProductCategory::Automotive)).is_empty());
        assert_eq!(service.search("", None).len(), 3);
    }

    #[test]
    fn test_mutations_rewrite_collection() {
        let storage = Storage::in_memory();
        let seller_id = seller(&storage, "ann_sells");
        let service = ProductService::new(&storage);
        service.create(&seller_id, listing("Desk", ProductCategory::HomeGarden));

        let raw: Vec<serde_json::Value> = storage.read(keys::PRODUCTS, Vec::new());
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0]["category"], "home-garden");
        assert_eq!(raw[0]["isAvailable"], true);
    }
}

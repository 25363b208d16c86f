//! Purchase service.
//!
//! A purchase snapshots the seller and total at the time of sale. Recording one
//! is three independent writes: the purchase, the buyer's cart row, and the
//! listing's availability.

use tracing::instrument;

use secondhand_core::{ProductId, UserId};

use crate::db::users::summary_or_unknown;
use crate::db::{ProductRepository, PurchaseRepository, UserRepository};
use crate::error::{MarketError, Result};
use crate::models::product::Product;
use crate::models::purchase::{Purchase, PurchaseWithDetails};
use crate::services::cart::CartService;
use crate::services::products::ProductService;
use crate::store::Storage;
use crate::validation::ValidationError;

/// Buying, checkout, and purchase history.
pub struct PurchaseService<'a> {
    purchases: PurchaseRepository<'a>,
    products: ProductRepository<'a>,
    users: UserRepository<'a>,
    listings: ProductService<'a>,
    cart: CartService<'a>,
}

impl<'a> PurchaseService<'a> {
    /// Create a new purchase service.
    #[must_use]
    pub const fn new(storage: &'a Storage) -> Self {
        Self {
            purchases: PurchaseRepository::new(storage),
            products: ProductRepository::new(storage),
            users: UserRepository::new(storage),
            listings: ProductService::new(storage),
            cart: CartService::new(storage),
        }
    }

    /// Buy `quantity` units of a listing.
    ///
    /// The buyer's cart row for the listing is removed and the listing is
    /// marked sold.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::NotFound` if the listing does not exist,
    /// `MarketError::ProductUnavailable` if it has already been sold, or
    /// `MarketError::Validation` if the total does not fit in a decimal.
    #[instrument(skip_all, fields(buyer_id = %buyer_id, product_id = %product_id, quantity = quantity))]
    pub fn create_purchase(
        &self,
        buyer_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Purchase> {
        let product = self
            .products
            .get_by_id(product_id)
            .ok_or_else(|| MarketError::not_found("product", product_id))?;
        let purchase = Self::prepare(buyer_id, &product, quantity)?;
        Ok(self.record(purchase))
    }

    /// Buy everything in the buyer's cart.
    ///
    /// Only rows whose listing still exists take part; rows for deleted
    /// listings are left alone. Every row is checked before anything is
    /// written, and one sold listing aborts the whole checkout.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::EmptyCart` if the cart has no listed rows, or the
    /// first `ProductUnavailable`/`Validation` failure among them.
    #[instrument(skip_all, fields(buyer_id = %buyer_id))]
    pub fn checkout(&self, buyer_id: &UserId) -> Result<Vec<Purchase>> {
        let rows = self.cart.list_for_user(buyer_id);
        if rows.is_empty() {
            return Err(MarketError::EmptyCart);
        }

        let checked = rows
            .iter()
            .map(|row| Self::prepare(buyer_id, &row.product.product, row.item.quantity))
            .collect::<Result<Vec<_>>>()?;

        let purchases: Vec<Purchase> = checked
            .into_iter()
            .map(|purchase| self.record(purchase))
            .collect();

        tracing::info!(count = purchases.len(), "Checkout completed");
        Ok(purchases)
    }

    /// The buyer's purchases, newest first. Purchases of deleted listings
    /// are skipped.
    #[must_use]
    pub fn history_for_user(&self, buyer_id: &UserId) -> Vec<PurchaseWithDetails> {
        self.with_details(|p| &p.buyer_id == buyer_id)
    }

    /// The seller's sales, newest first. Sales of deleted listings are
    /// skipped.
    #[must_use]
    pub fn sales_for_seller(&self, seller_id: &UserId) -> Vec<PurchaseWithDetails> {
        self.with_details(|p| &p.seller_id == seller_id)
    }

    fn prepare(buyer_id: &UserId, product: &Product, quantity: u32) -> Result<Purchase> {
        if !product.is_available {
            return Err(MarketError::ProductUnavailable(product.id.to_string()));
        }
        Purchase::completed(buyer_id.clone(), product, quantity)
            .ok_or(MarketError::Validation(ValidationError::TotalTooLarge))
    }

    fn record(&self, purchase: Purchase) -> Purchase {
        self.purchases.insert(purchase.clone());
        self.cart.remove_product(&purchase.buyer_id, &purchase.product_id);
        if let Err(e) = self.listings.mark_unavailable(&purchase.product_id) {
            tracing::warn!(
                product_id = %purchase.product_id,
                error = %e,
                "Sold listing vanished before it could be closed"
            );
        }

        tracing::info!(
            purchase_id = %purchase.id,
            total = %purchase.total_price,
            "Purchase recorded"
        );
        purchase
    }

    fn with_details(&self, include: impl Fn(&Purchase) -> bool) -> Vec<PurchaseWithDetails> {
        let products = self.products.all();
        let sellers = self.users.summaries();

        let mut details: Vec<PurchaseWithDetails> = self
            .purchases
            .all()
            .into_iter()
            .filter(|p| include(p))
            .filter_map(|purchase| {
                let product = products.iter().find(|p| p.id == purchase.product_id)?;
                Some(PurchaseWithDetails {
                    seller: summary_or_unknown(&sellers, &purchase.seller_id),
                    product: product.clone(),
                    purchase,
                })
            })
            .collect();
        details.sort_by(|a, b| b.purchase.purchased_at.cmp(&a.purchase.purchased_at));
        details
    }
}

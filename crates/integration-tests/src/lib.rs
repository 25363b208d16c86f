//! Integration tests for the Secondhand marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p secondhand-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Registration, login, and logout through the session manager
//! - `shopping_flow` - Listings, cart, checkout, and history across services
//! - `persistence` - File-backed stores, corrupt data, and shared sessions
//!
//! Every test builds its own [`TestContext`] over an in-memory store unless it
//! is exercising the file backend.

use secondhand_core::{Price, ProductCategory, UserId};
use secondhand_market::models::{AuthSession, NewProduct, Product};
use secondhand_market::{MarketConfig, Marketplace, Storage};

/// Password used by every helper-created account.
pub const PASSWORD: &str = "password123";

/// A marketplace with cheap password hashing.
#[derive(Clone, Debug)]
pub struct TestContext {
    pub market: Marketplace,
}

impl TestContext {
    /// Fresh in-memory marketplace.
    ///
    /// # Panics
    ///
    /// Panics if the test configuration is invalid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Storage::in_memory())
    }

    /// Marketplace over an existing storage handle.
    ///
    /// # Panics
    ///
    /// Panics if the test configuration is invalid.
    #[must_use]
    pub fn with_storage(storage: Storage) -> Self {
        let market = Marketplace::with_storage(MarketConfig::for_tests(), storage)
            .expect("test configuration is valid");
        Self { market }
    }

    /// Register `username` (email `<username>@example.com`) and stay signed in.
    ///
    /// # Panics
    ///
    /// Panics if registration fails.
    pub fn register(&self, username: &str) -> AuthSession {
        self.market
            .session()
            .register(&format!("{username}@example.com"), username, PASSWORD)
            .expect("registration succeeds")
    }

    /// Post a listing for `seller`.
    ///
    /// # Panics
    ///
    /// Panics if `price` is not a valid price.
    pub fn list(&self, seller: &UserId, title: &str, price: &str) -> Product {
        self.market.products().create(
            seller,
            NewProduct {
                title: title.to_owned(),
                description: format!("{title}, gently used"),
                price: price.parse::<Price>().expect("valid price"),
                category: ProductCategory::Other,
                image_url: "https://images.example.com/item.jpg".to_owned(),
            },
        )
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

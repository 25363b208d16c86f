//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, logout, and profile updates
//! - `products` - Listing CRUD, browsing, and search
//! - `cart` - Per-user cart with quantity merging
//! - `purchases` - Checkout and purchase history
//!
//! Services borrow a [`Storage`](crate::store::Storage) and are cheap to
//! construct per call; they hold no state of their own.

pub mod auth;
pub mod cart;
pub mod products;
pub mod purchases;

pub use auth::{AuthError, AuthService, AuthSettings};
pub use cart::CartService;
pub use products::ProductService;
pub use purchases::PurchaseService;

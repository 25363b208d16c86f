//! Domain models for the marketplace.
//!
//! Stored entities serialize with `camelCase` field names. The `*With*`
//! types are read-only views joining an entity with related records.

pub mod cart;
pub mod product;
pub mod purchase;
pub mod session;
pub mod user;

pub use cart::{CartItem, CartItemWithProduct};
pub use product::{NewProduct, Product, ProductUpdate, ProductWithSeller};
pub use purchase::{Purchase, PurchaseWithDetails};
pub use session::AuthSession;
pub use user::{ProfileUpdate, User, UserSummary};

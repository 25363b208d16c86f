//! Secondhand Market library.
//!
//! The data and auth layer of the marketplace: every entity service is a
//! synchronous wrapper around a key-value [`store::Storage`] that reads and
//! rewrites whole collections.
//!
//! # Modules
//!
//! - [`store`] - Key-value persistence adapter and backends
//! - [`db`] - Typed collection repositories
//! - [`models`] - Entities and denormalized views
//! - [`services`] - Product, cart, purchase, and auth services
//! - [`session`] - Session manager with change subscriptions
//! - [`state`] - [`Marketplace`] composition root

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod validation;

pub use config::MarketConfig;
pub use error::{ErrorKind, MarketError};
pub use session::SessionManager;
pub use state::Marketplace;
pub use store::Storage;

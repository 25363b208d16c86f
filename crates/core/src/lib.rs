//! Secondhand Core - Shared types library.
//!
//! This crate provides common types used across all marketplace components:
//! - `market` - Storage-backed entity services and the session manager
//! - `cli` - Command-line front end over the market library
//!
//! # Architecture
//!
//! The core crate contains only types and the identifier generator - no
//! storage access and no configuration. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, categories, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

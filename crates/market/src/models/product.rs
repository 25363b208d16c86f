//! Product listing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use secondhand_core::{Price, ProductCategory, ProductId, UserId};

use super::user::UserSummary;

/// A listing posted by a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// Owner of the listing. Never changes after creation.
    pub seller_id: UserId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: ProductCategory,
    pub image_url: String,
    /// Cleared once the item is sold.
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match against title and description.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Fields supplied by the seller when creating a listing.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: ProductCategory,
    pub image_url: String,
}

/// Partial listing edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<ProductCategory>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

impl ProductUpdate {
    /// Apply the present fields to `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(is_available) = self.is_available {
            product.is_available = is_available;
        }
    }
}

/// A listing joined with its seller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithSeller {
    #[serde(flatten)]
    pub product: Product,
    pub seller: UserSummary,
}

//! Shopping cart types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use secondhand_core::{CartItemId, ProductId, UserId};

use super::product::ProductWithSeller;

/// One product in a user's cart.
///
/// There is at most one item per (user, product); adding the same product
/// again raises the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// A cart item joined with the current listing and seller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemWithProduct {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: ProductWithSeller,
}

impl CartItemWithProduct {
    /// Current listing price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.product.price.times(self.item.quantity)
    }
}

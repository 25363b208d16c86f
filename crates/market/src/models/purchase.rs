//! Purchase history types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use secondhand_core::{ProductId, PurchaseId, PurchaseStatus, UserId};

use super::product::Product;
use super::user::UserSummary;

/// A completed purchase.
///
/// `seller_id` and `total_price` are copied from the listing when the
/// purchase is recorded and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub purchased_at: DateTime<Utc>,
    pub status: PurchaseStatus,
}

impl Purchase {
    /// Record `quantity` units of `product` bought by `buyer_id`.
    ///
    /// Returns `None` if the total overflows.
    #[must_use]
    pub fn completed(buyer_id: UserId, product: &Product, quantity: u32) -> Option<Self> {
        Some(Self {
            id: PurchaseId::generate(),
            buyer_id,
            seller_id: product.seller_id.clone(),
            product_id: product.id.clone(),
            quantity,
            total_price: product.price.checked_times(quantity)?,
            purchased_at: Utc::now(),
            status: PurchaseStatus::Completed,
        })
    }
}

/// A purchase joined with its listing and seller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWithDetails {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub product: Product,
    pub seller: UserSummary,
}

//! Buying and purchase history commands.

use secondhand_core::ProductId;
use secondhand_market::{MarketError, Marketplace, validation};

use super::{CommandError, signed_in};
use crate::output;

/// Buy one listing immediately.
pub fn buy(market: &Marketplace, product_id: &ProductId, quantity: u32) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    validation::check_quantity(quantity)?;

    let entry = market
        .products()
        .get_by_id(product_id)
        .ok_or_else(|| MarketError::not_found("product", product_id))?;
    if market.session().is_owner(&entry.product.seller_id) {
        return Err(CommandError::InvalidArgument {
            field: "product",
            reason: "you cannot buy your own listing".to_owned(),
        });
    }

    let purchase = market
        .purchases()
        .create_purchase(&session.id, product_id, quantity)?;
    output::receipts(&[purchase]);
    Ok(())
}

/// Buy everything in the cart.
pub fn checkout(market: &Marketplace) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    let purchases = market.purchases().checkout(&session.id)?;
    output::receipts(&purchases);
    Ok(())
}

/// Print the signed-in user's purchases.
pub fn history(market: &Marketplace) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    output::history(&market.purchases().history_for_user(&session.id));
    Ok(())
}

/// Print the signed-in user's sales.
pub fn sales(market: &Marketplace) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    output::sales(&market.purchases().sales_for_seller(&session.id));
    Ok(())
}

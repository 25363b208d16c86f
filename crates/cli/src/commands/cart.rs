//! Cart commands for the signed-in user.

use secondhand_core::{CartItemId, ProductId};
use secondhand_market::{MarketError, Marketplace, validation};

use super::{CommandError, signed_in};
use crate::output;

/// Print the cart with totals.
pub fn list(market: &Marketplace) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    let cart = market.cart();
    output::cart(
        &cart.list_for_user(&session.id),
        cart.total_for_user(&session.id),
        cart.count_for_user(&session.id),
    );
    Ok(())
}

/// Add an available listing to the cart.
pub fn add(market: &Marketplace, product_id: &ProductId, quantity: u32) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    validation::check_quantity(quantity)?;

    let entry = market
        .products()
        .get_by_id(product_id)
        .ok_or_else(|| MarketError::not_found("product", product_id))?;
    if !entry.product.is_available {
        return Err(MarketError::ProductUnavailable(product_id.to_string()).into());
    }
    if market.session().is_owner(&entry.product.seller_id) {
        return Err(CommandError::InvalidArgument {
            field: "product",
            reason: "you cannot buy your own listing".to_owned(),
        });
    }

    let item = market.cart().add_item(&session.id, product_id, quantity);
    output::status(&format!(
        "{} x {} in cart ({})",
        item.quantity, entry.product.title, item.id
    ));
    Ok(())
}

/// Change a cart row's quantity. Zero removes it.
pub fn set(market: &Marketplace, item_id: &CartItemId, quantity: u32) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    if quantity != 0 {
        validation::check_quantity(quantity)?;
    }
    ensure_own_item(market, &session.id, item_id)?;

    market.cart().set_quantity(item_id, quantity);
    output::status("Cart updated");
    Ok(())
}

/// Remove a cart row.
pub fn remove(market: &Marketplace, item_id: &CartItemId) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    ensure_own_item(market, &session.id, item_id)?;

    market.cart().remove_item(item_id);
    output::status("Removed from cart");
    Ok(())
}

/// Empty the cart.
pub fn clear(market: &Marketplace) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    market.cart().clear_for_user(&session.id);
    output::status("Cart cleared");
    Ok(())
}

fn ensure_own_item(
    market: &Marketplace,
    user_id: &secondhand_core::UserId,
    item_id: &CartItemId,
) -> Result<(), CommandError> {
    if market
        .cart()
        .items_for_user(user_id)
        .iter()
        .any(|item| &item.id == item_id)
    {
        Ok(())
    } else {
        Err(MarketError::not_found("cart item", item_id).into())
    }
}

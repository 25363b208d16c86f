//! Listing commands.

use secondhand_core::{Price, ProductCategory, ProductId};
use secondhand_market::models::{NewProduct, ProductUpdate};
use secondhand_market::{MarketError, Marketplace, validation};

use super::{CommandError, signed_in};
use crate::output;

/// Listing fields as typed on the command line.
pub struct Draft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: ProductCategory,
    pub image_url: String,
}

/// Listing edits as typed on the command line.
pub struct Edit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<ProductCategory>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

/// Print available listings.
pub fn list(market: &Marketplace) {
    output::listings(&market.products().list_available());
}

/// Print available listings matching `text` and `category`.
pub fn search(market: &Marketplace, text: &str, category: Option<ProductCategory>) {
    output::listings(&market.products().search(text, category));
}

/// Print one listing.
pub fn show(market: &Marketplace, id: &ProductId) -> Result<(), CommandError> {
    let entry = market
        .products()
        .get_by_id(id)
        .ok_or_else(|| MarketError::not_found("product", id))?;
    output::listing(&entry);
    Ok(())
}

/// Print the signed-in user's listings.
pub fn mine(market: &Marketplace) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    output::own_listings(&market.products().list_by_seller(&session.id));
    Ok(())
}

/// Post a listing as the signed-in user.
pub fn create(market: &Marketplace, draft: Draft) -> Result<(), CommandError> {
    let session = signed_in(market)?;
    let new = NewProduct {
        title: draft.title.trim().to_owned(),
        description: draft.description.trim().to_owned(),
        price: parse_price(&draft.price)?,
        category: draft.category,
        image_url: draft.image_url.trim().to_owned(),
    };
    validation::check_new_product(&new)?;

    let product = market.products().create(&session.id, new);
    output::status(&format!("Listed {} ({})", product.title, product.id));
    Ok(())
}

/// Edit one of the signed-in user's listings.
pub fn update(market: &Marketplace, id: &ProductId, edit: Edit) -> Result<(), CommandError> {
    ensure_owner(market, id)?;

    let update = ProductUpdate {
        title: edit.title.map(|t| t.trim().to_owned()),
        description: edit.description.map(|d| d.trim().to_owned()),
        price: edit.price.as_deref().map(parse_price).transpose()?,
        category: edit.category,
        image_url: edit.image_url.map(|u| u.trim().to_owned()),
        is_available: edit.available,
    };
    validation::check_product_update(&update)?;

    let product = market.products().update(id, update)?;
    output::status(&format!("Updated {} ({})", product.title, product.id));
    Ok(())
}

/// Delete one of the signed-in user's listings.
pub fn delete(market: &Marketplace, id: &ProductId) -> Result<(), CommandError> {
    ensure_owner(market, id)?;
    market.products().delete(id);
    output::status(&format!("Deleted {id}"));
    Ok(())
}

fn ensure_owner(market: &Marketplace, id: &ProductId) -> Result<(), CommandError> {
    signed_in(market)?;
    let entry = market
        .products()
        .get_by_id(id)
        .ok_or_else(|| MarketError::not_found("product", id))?;
    if !market.session().is_owner(&entry.product.seller_id) {
        return Err(CommandError::NotOwner);
    }
    Ok(())
}

fn parse_price(raw: &str) -> Result<Price, CommandError> {
    raw.parse().map_err(|e: secondhand_core::PriceError| CommandError::InvalidArgument {
        field: "price",
        reason: e.to_string(),
    })
}

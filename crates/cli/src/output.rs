//! Terminal rendering for command results.

#![allow(clippy::print_stdout)]

use rust_decimal::Decimal;

use secondhand_market::models::{
    AuthSession, CartItemWithProduct, Product, ProductWithSeller, Purchase, PurchaseWithDetails,
};

/// Print a plain status line.
pub fn status(message: &str) {
    println!("{message}");
}

/// Print the signed-in identity.
pub fn session(session: &AuthSession) {
    println!("{} <{}>", session.username, session.email);
    println!("  id:      {}", session.id);
    if let Some(bio) = &session.bio {
        println!("  bio:     {bio}");
    }
    if let Some(avatar) = &session.avatar {
        println!("  avatar:  {avatar}");
    }
    println!("  joined:  {}", session.created_at.format("%Y-%m-%d"));
}

/// One line per listing.
pub fn listings(entries: &[ProductWithSeller]) {
    if entries.is_empty() {
        println!("No listings found.");
        return;
    }
    for entry in entries {
        let product = &entry.product;
        println!(
            "{:<24} {:>12}  {:<16} {} (by {})",
            product.id,
            product.price.to_string(),
            product.category.label(),
            product.title,
            entry.seller.username
        );
    }
}

/// Full details of one listing.
pub fn listing(entry: &ProductWithSeller) {
    let product = &entry.product;
    println!("{}", product.title);
    println!("  id:        {}", product.id);
    println!("  price:     {}", product.price);
    println!("  category:  {}", product.category.label());
    println!("  seller:    {}", entry.seller.username);
    println!("  status:    {}", availability(product));
    println!("  image:     {}", product.image_url);
    println!("  listed:    {}", product.created_at.format("%Y-%m-%d %H:%M"));
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
}

/// The seller's own listings.
pub fn own_listings(products: &[Product]) {
    if products.is_empty() {
        println!("You have no listings.");
        return;
    }
    for product in products {
        println!(
            "{:<24} {:>12}  {:<9} {}",
            product.id,
            product.price.to_string(),
            availability(product),
            product.title
        );
    }
}

/// Cart rows with line totals and the grand total.
pub fn cart(items: &[CartItemWithProduct], total: Decimal, count: u32) {
    if items.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for entry in items {
        println!(
            "{:<24} {:>3} x {:<32} {:>12}",
            entry.item.id,
            entry.item.quantity,
            entry.product.product.title,
            money(entry.line_total())
        );
    }
    println!("{count} item(s), total {}", money(total));
}

/// Newly recorded purchases.
pub fn receipts(purchases: &[Purchase]) {
    for purchase in purchases {
        println!(
            "Purchased {} x {} for {} ({})",
            purchase.quantity,
            purchase.product_id,
            money(purchase.total_price),
            purchase.id
        );
    }
}

/// The buyer's purchase history.
pub fn history(entries: &[PurchaseWithDetails]) {
    if entries.is_empty() {
        println!("You have not bought anything yet.");
        return;
    }
    for entry in entries {
        purchase_line(entry, &format!("from {}", entry.seller.username));
    }
}

/// The seller's sales.
pub fn sales(entries: &[PurchaseWithDetails]) {
    if entries.is_empty() {
        println!("You have not sold anything yet.");
        return;
    }
    for entry in entries {
        purchase_line(entry, &format!("to {}", entry.purchase.buyer_id));
    }
}

fn purchase_line(entry: &PurchaseWithDetails, party: &str) {
    println!(
        "{}  {:<32} {:>3} x  {:>12}  {party}  [{}]",
        entry.purchase.purchased_at.format("%Y-%m-%d"),
        entry.product.title,
        entry.purchase.quantity,
        money(entry.purchase.total_price),
        entry.purchase.status
    );
}

fn availability(product: &Product) -> &'static str {
    if product.is_available { "available" } else { "sold" }
}

fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

//! Seed an empty store with demo users and listings.
//!
//! The catalogue is YAML: a list of `users` (registered through the normal
//! auth flow) and a list of `products` that name their seller by username.
//! Seeding is skipped when the store already has users.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use secondhand_core::{Price, ProductCategory, UserId};
use secondhand_market::Marketplace;
use secondhand_market::db::UserRepository;
use secondhand_market::models::NewProduct;
use secondhand_market::validation;

use super::CommandError;
use crate::output;

/// Built-in demo catalogue.
const DEMO_CATALOGUE: &str = include_str!("../../seed/demo.yaml");

/// Users and listings to create.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalogue {
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// A demo account.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// A demo listing.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedProduct {
    /// Seller's username.
    pub seller: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub category: ProductCategory,
    pub image_url: String,
}

/// Counts of what a seed run created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

/// Seed from `file`, or from the built-in catalogue.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an entry is
/// rejected by the marketplace.
pub fn run(market: &Marketplace, file: Option<&str>) -> Result<(), CommandError> {
    let catalogue = match file {
        Some(path) => {
            info!(path, "Loading seed catalogue from file");
            parse(&std::fs::read_to_string(Path::new(path))?)?
        }
        None => parse(DEMO_CATALOGUE)?,
    };

    match seed(market, &catalogue)? {
        Some(report) => output::status(&format!(
            "Seeded {} users and {} listings",
            report.users, report.products
        )),
        None => output::status("Store already has users; nothing seeded"),
    }
    Ok(())
}

/// Parse a YAML catalogue.
///
/// # Errors
///
/// Returns `CommandError::SeedFormat` if the YAML does not match [`Catalogue`].
pub fn parse(yaml: &str) -> Result<Catalogue, CommandError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Create the catalogue's users and listings. Returns `None` when the store
/// already has users.
///
/// Registration signs each account in; the store is signed out again
/// afterwards.
///
/// # Errors
///
/// Returns the first rejected user or listing. Entries created before the
/// failure are kept.
pub fn seed(market: &Marketplace, catalogue: &Catalogue) -> Result<Option<SeedReport>, CommandError> {
    if UserRepository::new(market.storage()).has_users() {
        info!("Store already has users, skipping seed");
        return Ok(None);
    }

    let result = create_all(market, catalogue);
    market.session().logout();
    let report = result?;

    info!(users = report.users, products = report.products, "Seed complete");
    Ok(Some(report))
}

fn create_all(market: &Marketplace, catalogue: &Catalogue) -> Result<SeedReport, CommandError> {
    let auth = market.auth();
    let mut sellers: HashMap<String, UserId> = HashMap::new();

    for user in &catalogue.users {
        let session = auth.register(&user.email, &user.username, &user.password)?;
        if let Some(bio) = &user.bio {
            auth.update_profile(
                &session.id,
                secondhand_market::models::ProfileUpdate {
                    bio: Some(bio.clone()),
                    ..Default::default()
                },
            )?;
        }
        sellers.insert(session.username, session.id);
    }

    let products = market.products();
    for product in &catalogue.products {
        let seller_id = sellers
            .get(&product.seller)
            .ok_or_else(|| CommandError::InvalidArgument {
                field: "seller",
                reason: format!("no seed user named {}", product.seller),
            })?;

        let new = NewProduct {
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category,
            image_url: product.image_url.clone(),
        };
        validation::check_new_product(&new)?;
        products.create(seller_id, new);
    }

    Ok(SeedReport {
        users: sellers.len(),
        products: catalogue.products.len(),
    })
}

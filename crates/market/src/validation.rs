//! Input rules applied before data reaches the services.
//!
//! Product and cart services accept whatever they are given; front ends call
//! these checks first. Registration applies the account rules itself.

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use secondhand_core::{Email, EmailError, Price};

use crate::models::product::{NewProduct, ProductUpdate};

/// Title length bounds, in characters.
pub const TITLE_LENGTH: (usize, usize) = (3, 100);
/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
/// Most expensive listing allowed.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Cart quantity bounds.
pub const QUANTITY_RANGE: (u32, u32) = (1, 10);
/// Username length bounds, in characters.
pub const USERNAME_LENGTH: (usize, usize) = (3, 30);
/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must be between {min} and {max} characters")]
    TitleLength { min: usize, max: usize },

    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("price must be at most {max}")]
    PriceTooHigh { max: Decimal },

    #[error("image must be an http(s) URL: {0}")]
    InvalidImageUrl(String),

    #[error("quantity must be between {min} and {max}")]
    QuantityOutOfRange { min: u32, max: u32 },

    #[error("order total is too large")]
    TotalTooLarge,

    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },

    #[error("username may only contain letters, digits, and underscores")]
    UsernameCharacters,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
}

/// Check a new listing.
///
/// # Errors
///
/// Returns the first rule the listing breaks.
pub fn check_new_product(product: &NewProduct) -> Result<(), ValidationError> {
    check_title(&product.title)?;
    check_description(&product.description)?;
    check_price(product.price)?;
    check_image_url(&product.image_url)
}

/// Check the fields present in a listing edit.
///
/// # Errors
///
/// Returns the first rule a present field breaks.
pub fn check_product_update(update: &ProductUpdate) -> Result<(), ValidationError> {
    if let Some(title) = &update.title {
        check_title(title)?;
    }
    if let Some(description) = &update.description {
        check_description(description)?;
    }
    if let Some(price) = update.price {
        check_price(price)?;
    }
    if let Some(image_url) = &update.image_url {
        check_image_url(image_url)?;
    }
    Ok(())
}

/// Check a cart or purchase quantity.
///
/// # Errors
///
/// Returns `QuantityOutOfRange` outside 1-10.
pub const fn check_quantity(quantity: u32) -> Result<(), ValidationError> {
    let (min, max) = QUANTITY_RANGE;
    if quantity < min || quantity > max {
        return Err(ValidationError::QuantityOutOfRange { min, max });
    }
    Ok(())
}

/// Parse and check an account email.
///
/// # Errors
///
/// Returns `ValidationError::Email` if the address is malformed.
pub fn parse_email(email: &str) -> Result<Email, ValidationError> {
    Ok(Email::parse(email)?)
}

/// Trim and check a username.
///
/// # Errors
///
/// Returns `UsernameLength` or `UsernameCharacters`.
pub fn normalize_username(username: &str) -> Result<String, ValidationError> {
    let username = username.trim();
    let (min, max) = USERNAME_LENGTH;
    let len = username.chars().count();
    if len < min || len > max {
        return Err(ValidationError::UsernameLength { min, max });
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameCharacters);
    }
    Ok(username.to_owned())
}

/// Check a new password.
///
/// # Errors
///
/// Returns `PasswordTooShort` below the minimum length.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    let (min, max) = TITLE_LENGTH;
    let len = title.trim().chars().count();
    if len < min || len > max {
        return Err(ValidationError::TitleLength { min, max });
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LENGTH,
        });
    }
    Ok(())
}

fn check_price(price: Price) -> Result<(), ValidationError> {
    if price.amount() > MAX_PRICE {
        return Err(ValidationError::PriceTooHigh { max: MAX_PRICE });
    }
    Ok(())
}

fn check_image_url(image_url: &str) -> Result<(), ValidationError> {
    let url = Url::parse(image_url)
        .map_err(|e| ValidationError::InvalidImageUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidImageUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(())
}

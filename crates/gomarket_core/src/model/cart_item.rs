//! Cart line item domain model.
//!
//! # Responsibility
//! - Define the canonical cart line shape persisted on device.
//! - Validate single items and whole cart lists before they are trusted.
//!
//! # Invariants
//! - `id` is non-empty and unique within one cart list.
//! - `quantity` is always >= 1 for an item present in the cart.
//! - `price` is finite and non-negative.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Product identifier as issued by the storefront catalog.
///
/// Catalog IDs are opaque strings, so this stays a plain alias.
pub type ProductId = String;

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product ID; unique within the cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image reference (usually a URL).
    pub image_url: String,
    /// Unit price in the storefront currency.
    pub price: f64,
    /// Number of units; starts at 1 when the product is first added.
    pub quantity: u32,
}

/// Add-to-cart request payload.
///
/// Carries no quantity: the store decides it (1 for new lines, +1 for
/// existing ones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

/// Validation failure for cart items and lists.
#[derive(Debug, Clone, PartialEq)]
pub enum CartItemValidationError {
    EmptyId,
    InvalidPrice { id: ProductId, price: f64 },
    ZeroQuantity(ProductId),
    DuplicateId(ProductId),
}

impl Display for CartItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "cart item id cannot be empty"),
            Self::InvalidPrice { id, price } => {
                write!(f, "cart item `{id}` has invalid price {price}")
            }
            Self::ZeroQuantity(id) => write!(f, "cart item `{id}` has zero quantity"),
            Self::DuplicateId(id) => write!(f, "duplicate cart item id `{id}`"),
        }
    }
}

impl Error for CartItemValidationError {}

impl NewCartItem {
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Checks identifier and price before the item reaches the store.
    pub fn validate(&self) -> Result<(), CartItemValidationError> {
        validate_id_and_price(&self.id, self.price)
    }

    /// Converts the request into a fresh cart line with quantity 1.
    pub fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

impl CartItem {
    /// Validates one persisted or in-memory cart line.
    pub fn validate(&self) -> Result<(), CartItemValidationError> {
        validate_id_and_price(&self.id, self.price)?;
        if self.quantity == 0 {
            return Err(CartItemValidationError::ZeroQuantity(self.id.clone()));
        }
        Ok(())
    }

    /// Line total (`price * quantity`).
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Validates every item plus list-level identifier uniqueness.
pub fn validate_cart_list(items: &[CartItem]) -> Result<(), CartItemValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        item.validate()?;
        if !seen.insert(item.id.as_str()) {
            return Err(CartItemValidationError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}

fn validate_id_and_price(id: &str, price: f64) -> Result<(), CartItemValidationError> {
    if id.trim().is_empty() {
        return Err(CartItemValidationError::EmptyId);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(CartItemValidationError::InvalidPrice {
            id: id.to_string(),
            price,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_cart_list, CartItem, CartItemValidationError, NewCartItem};

    fn item(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            title: "Shirt".to_string(),
            image_url: "https://cdn.example.com/shirt.png".to_string(),
            price: 10.0,
            quantity,
        }
    }

    #[test]
    fn new_item_starts_at_quantity_one() {
        let line = NewCartItem::new("A", "Shirt", "img", 10.0).into_cart_item();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.id, "A");
    }

    #[test]
    fn rejects_blank_id_and_bad_price() {
        let blank = NewCartItem::new("  ", "Shirt", "img", 10.0);
        assert_eq!(blank.validate(), Err(CartItemValidationError::EmptyId));

        let negative = NewCartItem::new("A", "Shirt", "img", -1.0);
        assert!(matches!(
            negative.validate(),
            Err(CartItemValidationError::InvalidPrice { .. })
        ));

        let nan = NewCartItem::new("A", "Shirt", "img", f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn list_validation_catches_duplicates_and_zero_quantity() {
        let duplicated = vec![item("A", 1), item("B", 2), item("A", 3)];
        assert_eq!(
            validate_cart_list(&duplicated),
            Err(CartItemValidationError::DuplicateId("A".to_string()))
        );

        let zero = vec![item("A", 0)];
        assert_eq!(
            validate_cart_list(&zero),
            Err(CartItemValidationError::ZeroQuantity("A".to_string()))
        );

        assert!(validate_cart_list(&[item("A", 1), item("B", 4)]).is_ok());
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(item("A", 3).line_total(), 30.0);
    }
}

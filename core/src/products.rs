//! Purchasable products.
//!
//! Products are a closed shape: unknown fields or modes are rejected when a
//! product is decoded, so nothing untyped reaches the checkout endpoint.

use crate::error::{MarketplaceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the payment provider bills a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// One-off payment.
    Payment,
    /// Recurring subscription.
    Subscription,
}

impl fmt::Display for CheckoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Payment => "payment",
            Self::Subscription => "subscription",
        })
    }
}

/// A product sold through the checkout redirector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Product {
    /// Provider product ID.
    pub id: String,
    /// Provider price ID.
    pub price_id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Billing mode.
    pub mode: CheckoutMode,
}

impl Product {
    /// Decode a product payload received from outside the crate.
    ///
    /// # Errors
    ///
    /// `Validation` if the payload has missing, unknown or empty fields.
    pub fn from_json(payload: &serde_json::Value) -> Result<Self> {
        let product: Self = serde_json::from_value(payload.clone())
            .map_err(|e| MarketplaceError::Validation(format!("unrecognised product: {e}")))?;
        if product.id.is_empty() || product.price_id.is_empty() {
            return Err(MarketplaceError::Validation(
                "product id and price id are required".into(),
            ));
        }
        Ok(product)
    }
}

/// Products offered on every dashboard.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![Product {
        id: "prod_SetbdHNHAB5kp6".into(),
        price_id: "price_1RjZoEROyjzYAPs13hu9pcPr".into(),
        name: "Adventure".into(),
        description: "Embark on an exciting adventure experience".into(),
        mode: CheckoutMode::Payment,
    }]
}

/// Catalog entry billed under `price_id`.
#[must_use]
pub fn find_by_price(price_id: &str) -> Option<Product> {
    catalog().into_iter().find(|p| p.price_id == price_id)
}

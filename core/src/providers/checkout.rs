//! Checkout redirector trait.

use crate::error::Result;
use crate::products::CheckoutMode;
use crate::state::AccessToken;
use serde::{Deserialize, Serialize};

/// Body sent to the checkout endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Payment-provider price identifier.
    pub price_id: String,
    /// Where the provider sends the buyer after paying.
    pub success_url: String,
    /// Where the provider sends the buyer after backing out.
    pub cancel_url: String,
    /// One-off payment or subscription.
    pub mode: CheckoutMode,
}

/// Checkout session created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Hosted checkout page to redirect the buyer to.
    pub url: String,
}

/// Turns a purchase intent into a hosted checkout URL.
pub trait CheckoutRedirector: Send + Sync {
    /// Create a checkout session on behalf of the bearer of `token`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider rejects the request → `MarketplaceError::Checkout`
    /// - The token is refused → `MarketplaceError::Unauthenticated`
    async fn start_checkout(
        &self,
        token: &AccessToken,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession>;
}

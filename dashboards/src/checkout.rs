//! Checkout flow.
//!
//! Turns a product purchase into a hosted-checkout redirect, and reads the
//! subscription the payment provider wrote back.

use crate::repository::Repository;
use crate::session::Session;
use crate::view::log_failure;
use basecamp_core::products::Product;
use basecamp_core::providers::{CheckoutRedirector, CheckoutRequest, RecordStore};
use basecamp_core::subscription::Subscription;
use basecamp_core::{MarketplaceError, Result};

/// Placeholder the payment provider replaces with the session ID.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// A started subscription and the catalog product it bills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Provider row.
    pub subscription: Subscription,
    /// Catalog entry for the billed price, if it is one we sell.
    pub product: Option<Product>,
}

impl Plan {
    /// Display name of the plan.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}

/// Purchase and subscription glue around a [`CheckoutRedirector`].
///
/// `store` must act as the session's user: the subscriptions view is
/// scoped by the caller's credentials, not by a filter.
#[derive(Debug, Clone)]
pub struct CheckoutFlow<C, S> {
    redirector: C,
    store: S,
    base_url: String,
}

impl<C, S> CheckoutFlow<C, S>
where
    C: CheckoutRedirector,
    S: RecordStore,
{
    /// Create a flow whose return URLs live under `base_url`.
    #[must_use]
    pub fn new(redirector: C, store: S, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            redirector,
            store,
            base_url,
        }
    }

    /// Checkout request for `product`.
    #[must_use]
    pub fn request_for(&self, product: &Product) -> CheckoutRequest {
        CheckoutRequest {
            price_id: product.price_id.clone(),
            success_url: format!("{}/success?session_id={SESSION_ID_PLACEHOLDER}", self.base_url),
            cancel_url: format!("{}/", self.base_url),
            mode: product.mode,
        }
    }

    /// Start a checkout for `product` and return the URL to send the
    /// buyer to.
    ///
    /// # Errors
    ///
    /// `Checkout` if the provider fails or answers without a URL;
    /// `Unauthenticated` if the session token is refused.
    pub async fn purchase(&self, session: &Session, product: &Product) -> Result<String> {
        const OP: &str = "start checkout";
        let request = self.request_for(product);

        let checkout = self
            .redirector
            .start_checkout(session.token(), &request)
            .await
            .inspect_err(|e| log_failure(OP, e))?;

        if checkout.url.trim().is_empty() {
            let error = MarketplaceError::Checkout("no redirect URL returned".into());
            log_failure(OP, &error);
            return Err(error);
        }

        tracing::info!(
            user = %session.principal().id,
            price = %product.price_id,
            mode = %product.mode,
            "checkout started"
        );
        Ok(checkout.url)
    }

    /// The session user's subscription, if checkout has at least started.
    ///
    /// Rows in an unrecognised provider state still count as started.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn subscription(&self, session: &Session) -> Result<Option<Plan>> {
        let row = Repository::new(&self.store)
            .subscription()
            .await
            .inspect_err(|e| log_failure("read subscription", e))?;

        Ok(row.filter(Subscription::is_started).map(|subscription| Plan {
            product: subscription.product(),
            subscription,
        }))
    }
}

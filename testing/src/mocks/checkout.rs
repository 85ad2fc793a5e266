//! Mock checkout redirector.

use basecamp_core::providers::{CheckoutRedirector, CheckoutRequest, CheckoutSession};
use basecamp_core::{AccessToken, MarketplaceError, Result};
use std::sync::{Arc, Mutex};

/// Records checkout requests and answers with a canned session.
#[derive(Debug, Clone)]
pub struct MockCheckoutRedirector {
    response: Result<CheckoutSession>,
    requests: Arc<Mutex<Vec<CheckoutRequest>>>,
}

impl MockCheckoutRedirector {
    /// Answer every request with a hosted-checkout URL.
    #[must_use]
    pub fn new() -> Self {
        Self::returning_url("https://checkout.test/c/pay/cs_test_basecamp")
    }

    /// Answer every request with `url`.
    #[must_use]
    pub fn returning_url(url: &str) -> Self {
        Self {
            response: Ok(CheckoutSession { url: url.to_string() }),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(MarketplaceError::Checkout(message.to_string())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for MockCheckoutRedirector {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutRedirector for MockCheckoutRedirector {
    async fn start_checkout(
        &self,
        token: &AccessToken,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession> {
        if token.is_empty() {
            return Err(MarketplaceError::Unauthenticated);
        }
        self.requests
            .lock()
            .map_err(|_| MarketplaceError::Checkout("mock lock poisoned".into()))?
            .push(request.clone());
        self.response.clone()
    }
}

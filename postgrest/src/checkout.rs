//! Checkout through the hosted `stripe-checkout` function.

use crate::config::Config;
use crate::error::ConfigError;
use basecamp_core::providers::{CheckoutRedirector, CheckoutRequest, CheckoutSession};
use basecamp_core::{AccessToken, MarketplaceError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Function answer: a session URL on success, an error message otherwise.
#[derive(Debug, Default, Deserialize)]
struct FunctionResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Starts checkouts by calling the `stripe-checkout` edge function.
#[derive(Debug, Clone)]
pub struct EdgeCheckoutRedirector {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl EdgeCheckoutRedirector {
    /// Name of the deployed function.
    pub const FUNCTION: &'static str = "stripe-checkout";

    /// Build a redirector from `config`.
    ///
    /// # Errors
    ///
    /// `ConfigError::Client` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            client: config.http_client()?,
            endpoint: format!("{}/{}", config.functions_url(), Self::FUNCTION),
            api_key: config.anon_key.clone(),
        })
    }
}

impl CheckoutRedirector for EdgeCheckoutRedirector {
    async fn start_checkout(
        &self,
        token: &AccessToken,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession> {
        if token.is_empty() {
            return Err(MarketplaceError::Unauthenticated);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(token.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| MarketplaceError::Checkout(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(MarketplaceError::Unauthenticated);
        }

        let body = response.json::<FunctionResponse>().await.unwrap_or_default();
        if let Some(error) = body.error {
            return Err(MarketplaceError::Checkout(error));
        }
        if !status.is_success() {
            return Err(MarketplaceError::Checkout(format!(
                "checkout function returned {status}"
            )));
        }
        let url = body
            .url
            .ok_or_else(|| MarketplaceError::Checkout("response carried no URL".into()))?;

        tracing::debug!(price = %request.price_id, "checkout session created");
        Ok(CheckoutSession { url })
    }
}

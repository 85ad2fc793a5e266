//! Mock identity provider.

use basecamp_core::providers::IdentityProvider;
use basecamp_core::{AccessToken, MarketplaceError, Principal, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maps bearer tokens to principals.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    principals: Arc<Mutex<HashMap<String, Principal>>>,
}

impl MockIdentityProvider {
    /// Create a provider that knows no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` as belonging to `principal`.
    #[must_use]
    pub fn with_token(self, token: &str, principal: Principal) -> Self {
        if let Ok(mut principals) = self.principals.lock() {
            principals.insert(token.to_string(), principal);
        }
        self
    }

    /// Forget `token`, as if the session expired.
    pub fn revoke(&self, token: &str) {
        if let Ok(mut principals) = self.principals.lock() {
            principals.remove(token);
        }
    }
}

impl IdentityProvider for MockIdentityProvider {
    async fn resolve(&self, token: &AccessToken) -> Result<Principal> {
        if token.is_empty() {
            return Err(MarketplaceError::Unauthenticated);
        }
        self.principals
            .lock()
            .map_err(|_| MarketplaceError::Unauthenticated)?
            .get(token.expose())
            .copied()
            .ok_or(MarketplaceError::Unauthenticated)
    }
}

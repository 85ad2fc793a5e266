//! Identity provider trait.

use crate::error::Result;
use crate::state::{AccessToken, Principal};

/// Resolves the principal behind a bearer credential.
pub trait IdentityProvider: Send + Sync {
    /// Look up who `token` belongs to and which role they hold.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The token is missing, expired or unknown → `MarketplaceError::Unauthenticated`
    /// - The user has no marketplace profile → `MarketplaceError::NotFound`
    /// - The identity service cannot be reached → `MarketplaceError::Store`
    async fn resolve(&self, token: &AccessToken) -> Result<Principal>;
}

//! Signed-in session.

use crate::dispatch::Dashboard;
use crate::environment::DashboardEnvironment;
use crate::view::log_failure;
use basecamp_core::providers::{IdentityProvider, RecordStore};
use basecamp_core::{AccessToken, MarketplaceError, Principal, Result};

/// A resolved principal together with the credential that proved it.
///
/// The credential is kept for calls made on the user's behalf, such as
/// starting a checkout.
#[derive(Debug, Clone)]
pub struct Session {
    principal: Principal,
    token: AccessToken,
}

impl Session {
    /// Resolve `token` to a principal.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for an empty token (no provider call) and whatever
    /// the identity provider returns.
    pub async fn establish<I: IdentityProvider>(identity: &I, token: AccessToken) -> Result<Self> {
        const OP: &str = "establish session";
        if token.is_empty() {
            let error = MarketplaceError::Unauthenticated;
            log_failure(OP, &error);
            return Err(error);
        }

        let principal = identity
            .resolve(&token)
            .await
            .inspect_err(|e| log_failure(OP, e))?;
        tracing::info!(user = %principal.id, role = %principal.role, "session established");
        Ok(Self { principal, token })
    }

    /// Who is signed in.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Bearer credential.
    #[must_use]
    pub const fn token(&self) -> &AccessToken {
        &self.token
    }

    /// The dashboard for this session's role.
    #[must_use]
    pub fn dashboard<S>(&self, env: DashboardEnvironment<S>) -> Dashboard<S>
    where
        S: RecordStore + Clone,
    {
        Dashboard::for_principal(&self.principal, env)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use basecamp_core::{Role, UserId};
    use basecamp_testing::MockIdentityProvider;

    #[tokio::test]
    async fn resolves_known_tokens() {
        let host = Principal::new(UserId::new(), Role::Host);
        let identity = MockIdentityProvider::new().with_token("tok-host", host);

        let session = Session::establish(&identity, AccessToken::new("tok-host")).await.unwrap();
        assert_eq!(session.principal(), &host);
        assert_eq!(session.token().expose(), "tok-host");
    }

    #[tokio::test]
    async fn rejects_empty_and_unknown_tokens() {
        let identity = MockIdentityProvider::new();
        for token in ["", "tok-unknown"] {
            let err = Session::establish(&identity, AccessToken::new(token)).await.unwrap_err();
            assert!(matches!(err, MarketplaceError::Unauthenticated));
        }
    }
}

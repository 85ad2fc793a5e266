//! # Basecamp `PostgREST`
//!
//! Production collaborators for the Basecamp marketplace, talking HTTP to
//! a hosted Supabase-style backend:
//!
//! - [`PostgrestStore`]: [`RecordStore`] over `/rest/v1`
//! - [`AuthIdentityProvider`]: [`IdentityProvider`] over `/auth/v1/user`
//!   plus the `users` table
//! - [`EdgeCheckoutRedirector`]: [`CheckoutRedirector`] over the
//!   `stripe-checkout` function
//!
//! ## Example
//!
//! ```no_run
//! use basecamp_postgrest::{Backend, Config};
//!
//! # fn main() -> Result<(), basecamp_postgrest::ConfigError> {
//! let config = Config::from_env()?;
//! let backend = Backend::connect(&config)?;
//! # let _ = backend;
//! # Ok(())
//! # }
//! ```
//!
//! [`RecordStore`]: basecamp_core::providers::RecordStore
//! [`IdentityProvider`]: basecamp_core::providers::IdentityProvider
//! [`CheckoutRedirector`]: basecamp_core::providers::CheckoutRedirector

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod checkout;
pub mod config;
pub mod error;
pub mod identity;
pub mod store;

pub use checkout::EdgeCheckoutRedirector;
pub use config::Config;
pub use error::ConfigError;
pub use identity::AuthIdentityProvider;
pub use store::PostgrestStore;

/// The three collaborators, sharing one configuration.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Record store.
    pub store: PostgrestStore,
    /// Identity provider.
    pub identity: AuthIdentityProvider,
    /// Checkout redirector.
    pub checkout: EdgeCheckoutRedirector,
}

impl Backend {
    /// Build every collaborator from `config`.
    ///
    /// # Errors
    ///
    /// `ConfigError::Client` if the HTTP client cannot be built.
    pub fn connect(config: &Config) -> Result<Self, ConfigError> {
        let backend = Self {
            store: PostgrestStore::new(config)?,
            identity: AuthIdentityProvider::new(config)?,
            checkout: EdgeCheckoutRedirector::new(config)?,
        };
        tracing::info!(url = %config.supabase_url, "backend configured");
        Ok(backend)
    }
}

//! Collaborator interfaces.
//!
//! The marketplace talks to three hosted services: a relational record
//! store, an identity provider and a payment checkout endpoint. These
//! traits are the only things the dashboards depend on.
//!
//! This enables:
//! - **Testing**: in-memory mocks with call logs (`basecamp-testing`)
//! - **Production**: HTTP clients for the hosted services (`basecamp-postgrest`)

pub mod checkout;
pub mod identity;
pub mod record_store;

pub use checkout::{CheckoutRedirector, CheckoutRequest, CheckoutSession};
pub use identity::IdentityProvider;
pub use record_store::RecordStore;

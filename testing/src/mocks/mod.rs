//! Mock collaborator implementations for testing.
//!
//! Simple, in-memory implementations of every provider trait in
//! `basecamp_core::providers`.

pub mod checkout;
pub mod identity;
pub mod record_store;

pub use checkout::MockCheckoutRedirector;
pub use identity::MockIdentityProvider;
pub use record_store::{MockRecordStore, StoreCall};

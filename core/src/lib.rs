//! # Basecamp Core
//!
//! Domain model and booking workflow for an adventure-package marketplace.
//!
//! Guests browse and book packages, hosts list them, and a superadmin
//! approves listings. This crate holds everything that does not depend on
//! how data is fetched:
//!
//! - [`state`]: users, packages, bookings, wishlist entries, principals
//! - [`workflow`]: the package approval and booking lifecycle state machines
//! - [`stats`]: revenue and status reductions for the dashboards
//! - [`query`]: store-agnostic query description
//! - [`providers`]: traits for the record store, identity provider and
//!   checkout redirector
//! - [`products`] / [`subscription`]: payment catalog and subscription rows
//!
//! ## Example
//!
//! ```
//! use basecamp_core::environment::SystemClock;
//! use basecamp_core::state::{Money, PackageDraft, PackageStatus, Principal, Role, UserId};
//! use basecamp_core::workflow;
//!
//! let host = Principal::new(UserId::new(), Role::Host);
//! let draft = PackageDraft {
//!     name: "Trek".into(),
//!     description: String::new(),
//!     price: Money::new(500),
//!     max_people: 4,
//!     duration_days: 3,
//!     location: "Annapurna".into(),
//!     images: vec![],
//! };
//!
//! let package = workflow::new_package(&host, draft, &SystemClock)?;
//! assert_eq!(package.status, PackageStatus::Draft);
//! assert_eq!(workflow::submit_for_approval(&host, &package)?, PackageStatus::Pending);
//! # Ok::<(), basecamp_core::MarketplaceError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![allow(async_fn_in_trait)]

pub mod environment;
pub mod error;
pub mod products;
pub mod providers;
pub mod query;
pub mod state;
pub mod stats;
pub mod subscription;
pub mod workflow;

// Re-export main types for convenience
pub use error::{MarketplaceError, Result, StoreError};
pub use query::{Filter, Query, Relation, Table};
pub use state::{
    AccessToken, Booking, BookingId, BookingStatus, Money, Package, PackageDraft, PackageId,
    PackageStatus, PaymentStatus, Principal, Role, User, UserId, WishlistEntry, WishlistId,
};

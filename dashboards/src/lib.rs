//! # Basecamp Dashboards
//!
//! Role-scoped controllers over a [`RecordStore`]:
//!
//! - [`GuestDashboard`]: approved packages, own bookings and wishlist
//! - [`HostDashboard`]: own packages, bookings against them, host stats
//! - [`SuperAdminDashboard`]: everything, the approval queue, platform stats
//!
//! Every call takes the acting [`Principal`] explicitly. Each controller
//! keeps a snapshot of what it last fetched; a failed fetch leaves the
//! snapshot as it was and marks the [`LoadState`] as failed.
//!
//! ## Example
//!
//! ```ignore
//! use basecamp_dashboards::{Dashboard, DashboardEnvironment, Session};
//!
//! let session = Session::establish(&identity, token).await?;
//! let mut dashboard = session.dashboard(DashboardEnvironment::with_system_clock(store));
//! dashboard.refresh(session.principal()).await?;
//! ```
//!
//! [`RecordStore`]: basecamp_core::providers::RecordStore
//! [`Principal`]: basecamp_core::Principal

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod checkout;
pub mod dispatch;
pub mod environment;
pub mod guest;
pub mod host;
pub mod repository;
pub mod session;
pub mod superadmin;
pub mod view;

pub use checkout::{CheckoutFlow, Plan};
pub use dispatch::Dashboard;
pub use environment::DashboardEnvironment;
pub use guest::GuestDashboard;
pub use host::HostDashboard;
pub use repository::Repository;
pub use session::Session;
pub use superadmin::SuperAdminDashboard;
pub use view::{AdminView, GuestView, HostView, LoadState};

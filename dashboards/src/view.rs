//! In-memory snapshots held by the dashboards.

use basecamp_core::{Booking, MarketplaceError, Package, Result, User, WishlistEntry};

/// Progress of the most recent fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed; the snapshot still holds the previous data.
    Failed(String),
}

impl LoadState {
    /// `true` while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error message of the last failed fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn begin(&mut self) {
        *self = Self::Loading;
    }

    /// Record how a fetch ended and hand the outcome back.
    pub(crate) fn settle<T>(&mut self, what: &'static str, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                *self = Self::Loaded;
                Ok(value)
            }
            Err(error) => {
                log_failure(what, &error);
                *self = Self::Failed(error.to_string());
                Err(error)
            }
        }
    }
}

/// Log a failed operation at the level its cause deserves.
pub(crate) fn log_failure(what: &'static str, error: &MarketplaceError) {
    if error.is_user_error() {
        tracing::warn!(operation = what, error = %error, "operation rejected");
    } else {
        tracing::error!(operation = what, error = %error, "operation failed");
    }
}

/// What a guest sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestView {
    /// Approved packages, newest first, with their hosts.
    pub packages: Vec<Package>,
    /// The guest's bookings, newest first, with their packages.
    pub bookings: Vec<Booking>,
    /// The guest's wishlist, with packages.
    pub wishlist: Vec<WishlistEntry>,
    /// Fetch progress.
    pub load: LoadState,
}

/// What a host sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostView {
    /// The host's packages, newest first.
    pub packages: Vec<Package>,
    /// Bookings against those packages, newest first, with package and guest.
    pub bookings: Vec<Booking>,
    /// Fetch progress.
    pub load: LoadState,
}

/// What the superadmin sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminView {
    /// Every package, newest first, with its host.
    pub packages: Vec<Package>,
    /// Every booking, newest first, with package and guest.
    pub bookings: Vec<Booking>,
    /// Every user, newest first.
    pub users: Vec<User>,
    /// Fetch progress.
    pub load: LoadState,
}

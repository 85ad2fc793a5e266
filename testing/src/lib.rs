//! # Basecamp Testing
//!
//! Testing utilities for the Basecamp marketplace.
//!
//! This crate provides:
//! - In-memory implementations of the collaborator traits ([`mocks`])
//! - Deterministic clocks
//! - Record fixtures ([`fixtures`])
//! - Tracing setup for test output
//!
//! ## Example
//!
//! ```ignore
//! use basecamp_testing::{fixtures, mocks::MockRecordStore, test_clock};
//!
//! #[tokio::test]
//! async fn guest_sees_approved_packages() {
//!     let store = MockRecordStore::new();
//!     let host = fixtures::user(Role::Host);
//!     store.seed_record(Table::Users, &host);
//!     store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Approved));
//!     // ...
//! }
//! ```

use basecamp_core::environment::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

pub mod fixtures;
pub mod mocks;

/// Fixed clock for deterministic tests.
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use basecamp_testing::FixedClock;
/// use basecamp_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Clock that moves forward by a fixed step on every reading.
///
/// Gives records created in sequence strictly increasing `created_at`
/// values, so "newest first" ordering is observable.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    /// Start at `start`, advancing by `step` per reading.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        match self.next.lock() {
            Ok(mut next) => {
                let now = *next;
                *next = now + self.step;
                now
            }
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// The instant every test clock starts from: 2025-01-01 00:00:00 UTC.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock::new(epoch())
}

/// Create a clock that ticks one second per reading from [`epoch`].
#[must_use]
pub fn stepping_clock() -> SteppingClock {
    SteppingClock::new(epoch(), Duration::seconds(1))
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honours `RUST_LOG`; defaults to debug output for the Basecamp crates.
/// Safe to call from every test.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("basecamp_dashboards=debug,basecamp_postgrest=debug")
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{MockCheckoutRedirector, MockIdentityProvider, MockRecordStore, StoreCall};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn stepping_clock_advances() {
        let clock = stepping_clock();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::seconds(1));
    }
}

//! Dashboard environment.
//!
//! This module defines the environment type for dependency injection
//! into the dashboard controllers.

use basecamp_core::environment::{Clock, SystemClock};
use basecamp_core::providers::RecordStore;
use std::sync::Arc;

/// Dashboard environment.
///
/// Contains all external dependencies needed by the controllers.
///
/// # Type Parameters
///
/// - `S`: Record store
#[derive(Clone)]
pub struct DashboardEnvironment<S>
where
    S: RecordStore + Clone,
{
    /// Record store (hosted `PostgREST` in production).
    pub store: S,

    /// Clock used to stamp new records.
    pub clock: Arc<dyn Clock>,
}

impl<S> DashboardEnvironment<S>
where
    S: RecordStore + Clone,
{
    /// Creates a new `DashboardEnvironment`.
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates an environment stamped by the wall clock.
    #[must_use]
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }
}

impl<S> std::fmt::Debug for DashboardEnvironment<S>
where
    S: RecordStore + Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardEnvironment")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

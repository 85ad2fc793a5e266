//! Host dashboard.
//!
//! List packages, submit them for approval, and decide on the bookings
//! guests place against them.

use crate::environment::DashboardEnvironment;
use crate::repository::Repository;
use crate::view::{HostView, log_failure};
use basecamp_core::providers::RecordStore;
use basecamp_core::stats::HostStats;
use basecamp_core::workflow::{self, BookingDecision};
use basecamp_core::{
    Booking, BookingId, BookingStatus, Filter, MarketplaceError, Package, PackageDraft, PackageId,
    Principal, Result, Role, Table,
};
use serde_json::json;

fn authorize(principal: &Principal, action: &'static str) -> Result<()> {
    if principal.has_role(Role::Host) {
        Ok(())
    } else {
        Err(MarketplaceError::unauthorized(
            action,
            format!("role `{}` has no host dashboard", principal.role),
        ))
    }
}

/// Controller behind the host dashboard.
#[derive(Debug)]
pub struct HostDashboard<S>
where
    S: RecordStore + Clone,
{
    env: DashboardEnvironment<S>,
    view: HostView,
}

impl<S> HostDashboard<S>
where
    S: RecordStore + Clone,
{
    /// Creates a dashboard with an empty snapshot.
    #[must_use]
    pub fn new(env: DashboardEnvironment<S>) -> Self {
        Self {
            env,
            view: HostView::default(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub const fn view(&self) -> &HostView {
        &self.view
    }

    fn repo(&self) -> Repository<'_, S> {
        Repository::new(&self.env.store)
    }

    /// Fetch the host's own packages, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-hosts; store failures (snapshot kept).
    pub async fn list_own_packages(&mut self, principal: &Principal) -> Result<&[Package]> {
        const OP: &str = "list own packages";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().host_packages(principal.id).await;
        self.view.packages = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.packages)
    }

    /// Fetch the bookings against the host's packages, with package and
    /// guest.
    ///
    /// The package list is fetched first to scope the booking query, and
    /// both are stored in the snapshot. A host without packages gets no
    /// booking query at all.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-hosts; store failures (snapshot kept).
    pub async fn list_bookings_for_own_packages(
        &mut self,
        principal: &Principal,
    ) -> Result<&[Booking]> {
        const OP: &str = "list bookings";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.fetch_all(principal).await;
        let (packages, bookings) = self.view.load.settle(OP, outcome)?;
        self.view.packages = packages;
        self.view.bookings = bookings;
        Ok(&self.view.bookings)
    }

    /// Re-fetch packages and bookings.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-hosts; store failures (snapshot kept).
    pub async fn refresh(&mut self, principal: &Principal) -> Result<()> {
        self.list_bookings_for_own_packages(principal).await.map(|_| ())
    }

    async fn fetch_all(&self, principal: &Principal) -> Result<(Vec<Package>, Vec<Booking>)> {
        let repo = self.repo();
        let packages = repo.host_packages(principal.id).await?;
        let ids: Vec<PackageId> = packages.iter().map(|p| p.id).collect();
        let bookings = repo.bookings_for_packages(&ids).await?;
        Ok((packages, bookings))
    }

    /// List a new package as a draft.
    ///
    /// # Errors
    ///
    /// `Unauthorized` / `Validation` before any store call; store failures.
    pub async fn create_package(
        &mut self,
        principal: &Principal,
        draft: PackageDraft,
    ) -> Result<Package> {
        const OP: &str = "create package";
        let package = workflow::new_package(principal, draft, self.env.clock.as_ref())
            .inspect_err(|e| log_failure(OP, e))?;

        let saved: Package = self
            .repo()
            .insert(Table::Packages, &package)
            .await
            .inspect_err(|e| log_failure(OP, e))?;

        tracing::info!(package = %saved.id, name = %saved.name, "package drafted");
        self.view.packages.insert(0, saved.clone());
        Ok(saved)
    }

    /// Move one of the host's draft packages to `pending`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the package belongs to someone else
    /// - `InvalidTransition` unless the package is a draft, including when
    ///   the store no longer holds it as one
    /// - `NotFound` and store failures
    pub async fn submit_for_approval(
        &mut self,
        principal: &Principal,
        package_id: PackageId,
    ) -> Result<Package> {
        const OP: &str = "submit package";
        self.try_submit(principal, package_id)
            .await
            .inspect_err(|e| log_failure(OP, e))
    }

    async fn try_submit(
        &mut self,
        principal: &Principal,
        package_id: PackageId,
    ) -> Result<Package> {
        authorize(principal, "submit package")?;
        let package = self.locate_package(package_id).await?;
        let next = workflow::submit_for_approval(principal, &package)?;

        let guard = [
            Filter::eq("id", package.id),
            Filter::eq("host_id", principal.id),
            Filter::eq("status", package.status),
        ];
        let updated: Vec<Package> = self
            .repo()
            .update(Table::Packages, &guard, json!({ "status": next }))
            .await?;
        let Some(mut updated) = updated.into_iter().next() else {
            return Err(MarketplaceError::transition("package", package.status, next));
        };
        updated.host = package.host;

        tracing::info!(package = %updated.id, status = %updated.status, "package submitted");
        match self.view.packages.iter_mut().find(|p| p.id == updated.id) {
            Some(slot) => *slot = updated.clone(),
            None => self.view.packages.insert(0, updated.clone()),
        }
        Ok(updated)
    }

    /// Confirm or cancel a pending booking on one of the host's packages.
    ///
    /// Only `confirmed` and `cancelled` are accepted; the payment status
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// - `Validation` for any other target status
    /// - `Unauthorized` if the booked package belongs to someone else
    /// - `InvalidTransition` unless the booking is pending, including when
    ///   the store no longer holds it as pending
    /// - `NotFound` and store failures
    pub async fn set_booking_status(
        &mut self,
        principal: &Principal,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking> {
        const OP: &str = "update booking";
        self.try_set_booking_status(principal, booking_id, status)
            .await
            .inspect_err(|e| log_failure(OP, e))
    }

    async fn try_set_booking_status(
        &mut self,
        principal: &Principal,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking> {
        authorize(principal, "update booking")?;
        let decision = BookingDecision::try_from(status)?;

        let booking = match self.view.bookings.iter().find(|b| b.id == booking_id) {
            Some(booking) => booking.clone(),
            None => self.repo().booking(booking_id).await?,
        };
        let package = match booking.package.clone() {
            Some(package) => package,
            None => self.locate_package(booking.package_id).await?,
        };
        let next = workflow::decide_booking(principal, &package, &booking, decision)?;

        let guard = [
            Filter::eq("id", booking.id),
            Filter::eq("package_id", package.id),
            Filter::eq("status", booking.status),
        ];
        let updated: Vec<Booking> = self
            .repo()
            .update(Table::Bookings, &guard, json!({ "status": next }))
            .await?;
        let Some(mut updated) = updated.into_iter().next() else {
            return Err(MarketplaceError::transition("booking", booking.status, next));
        };
        updated.package = booking.package.or(Some(package));
        updated.guest = booking.guest;

        tracing::info!(booking = %updated.id, status = %updated.status, "booking decided");
        if let Some(slot) = self.view.bookings.iter_mut().find(|b| b.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn locate_package(&self, id: PackageId) -> Result<Package> {
        match self.view.packages.iter().find(|p| p.id == id) {
            Some(package) => Ok(package.clone()),
            None => self.repo().package(id).await,
        }
    }

    /// Revenue, booking and package counts over the current snapshot.
    #[must_use]
    pub fn compute_host_stats(&self) -> HostStats {
        HostStats::compute(&self.view.packages, &self.view.bookings)
    }
}

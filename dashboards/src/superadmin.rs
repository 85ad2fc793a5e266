//! Superadmin dashboard.
//!
//! Platform-wide reads, the package approval queue, and platform metrics.

use crate::environment::DashboardEnvironment;
use crate::repository::Repository;
use crate::view::{AdminView, log_failure};
use basecamp_core::providers::RecordStore;
use basecamp_core::stats::PlatformStats;
use basecamp_core::workflow::{self, ReviewDecision};
use basecamp_core::{
    Booking, Filter, MarketplaceError, Package, PackageId, PackageStatus, Principal, Result,
    Table, User,
};
use serde_json::json;

fn authorize(principal: &Principal, action: &'static str) -> Result<()> {
    workflow::authorize_review(principal).map_err(|_| {
        MarketplaceError::unauthorized(
            action,
            format!("role `{}` has no admin dashboard", principal.role),
        )
    })
}

/// Controller behind the superadmin dashboard.
#[derive(Debug)]
pub struct SuperAdminDashboard<S>
where
    S: RecordStore + Clone,
{
    env: DashboardEnvironment<S>,
    view: AdminView,
}

impl<S> SuperAdminDashboard<S>
where
    S: RecordStore + Clone,
{
    /// Creates a dashboard with an empty snapshot.
    #[must_use]
    pub fn new(env: DashboardEnvironment<S>) -> Self {
        Self {
            env,
            view: AdminView::default(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub const fn view(&self) -> &AdminView {
        &self.view
    }

    fn repo(&self) -> Repository<'_, S> {
        Repository::new(&self.env.store)
    }

    /// Fetch every package with its host, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-superadmins; store failures (snapshot kept).
    pub async fn list_all_packages(&mut self, principal: &Principal) -> Result<&[Package]> {
        const OP: &str = "list all packages";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().all_packages().await;
        self.view.packages = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.packages)
    }

    /// Fetch every booking with package and guest, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-superadmins; store failures (snapshot kept).
    pub async fn list_all_bookings(&mut self, principal: &Principal) -> Result<&[Booking]> {
        const OP: &str = "list all bookings";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().all_bookings().await;
        self.view.bookings = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.bookings)
    }

    /// Fetch every user, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-superadmins; store failures (snapshot kept).
    pub async fn list_all_users(&mut self, principal: &Principal) -> Result<&[User]> {
        const OP: &str = "list all users";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().all_users().await;
        self.view.users = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.users)
    }

    /// Re-fetch packages, bookings and users; applied only if all succeed.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-superadmins; store failures (snapshot kept).
    pub async fn refresh(&mut self, principal: &Principal) -> Result<()> {
        const OP: &str = "refresh admin dashboard";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.fetch_all().await;
        let (packages, bookings, users) = self.view.load.settle(OP, outcome)?;
        self.view.packages = packages;
        self.view.bookings = bookings;
        self.view.users = users;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<(Vec<Package>, Vec<Booking>, Vec<User>)> {
        let repo = self.repo();
        Ok((
            repo.all_packages().await?,
            repo.all_bookings().await?,
            repo.all_users().await?,
        ))
    }

    /// Packages awaiting review, in snapshot order.
    #[must_use]
    pub fn pending_packages(&self) -> Vec<&Package> {
        self.view
            .packages
            .iter()
            .filter(|p| p.status == PackageStatus::Pending)
            .collect()
    }

    /// Approve or reject a pending package.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for non-superadmins, before any store call
    /// - `Validation` for a target other than `approved` / `rejected`
    /// - `InvalidTransition` unless the package is pending, including when
    ///   the store no longer holds it as pending
    /// - `NotFound` and store failures
    pub async fn set_package_status(
        &mut self,
        principal: &Principal,
        package_id: PackageId,
        status: PackageStatus,
    ) -> Result<Package> {
        const OP: &str = "review package";
        self.try_review(principal, package_id, status)
            .await
            .inspect_err(|e| log_failure(OP, e))
    }

    async fn try_review(
        &mut self,
        principal: &Principal,
        package_id: PackageId,
        status: PackageStatus,
    ) -> Result<Package> {
        workflow::authorize_review(principal)?;
        let decision = ReviewDecision::try_from(status)?;

        let package = match self.view.packages.iter().find(|p| p.id == package_id) {
            Some(package) => package.clone(),
            None => self.repo().package(package_id).await?,
        };
        let next = workflow::review_package(principal, &package, decision)?;

        let guard = [
            Filter::eq("id", package.id),
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

        tracing::info!(package = %updated.id, status = %updated.status, "package reviewed");
        if let Some(slot) = self.view.packages.iter_mut().find(|p| p.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Platform metrics over the current snapshot.
    #[must_use]
    pub fn compute_platform_stats(&self) -> PlatformStats {
        PlatformStats::compute(&self.view.users, &self.view.packages, &self.view.bookings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use basecamp_core::Role;
    use basecamp_testing::{MockRecordStore, fixtures, test_clock};
    use std::sync::Arc;

    fn dashboard(store: &MockRecordStore) -> SuperAdminDashboard<MockRecordStore> {
        SuperAdminDashboard::new(DashboardEnvironment::new(store.clone(), Arc::new(test_clock())))
    }

    #[tokio::test]
    async fn guests_cannot_review() {
        let store = MockRecordStore::new();
        let guest = fixtures::user(Role::Guest).principal();

        let err = dashboard(&store)
            .set_package_status(&guest, PackageId::new(), PackageStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::Unauthorized { .. }));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_packages_stay_rejected() {
        let store = MockRecordStore::new();
        let admin = fixtures::user(Role::SuperAdmin);
        let host = fixtures::user(Role::Host);
        let package = fixtures::package(&host, PackageStatus::Pending);
        store.seed_record(Table::Users, &host);
        store.seed_record(Table::Packages, &package);

        let mut dash = dashboard(&store);
        dash.refresh(&admin.principal()).await.unwrap();
        assert_eq!(dash.pending_packages().len(), 1);

        let rejected = dash
            .set_package_status(&admin.principal(), package.id, PackageStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(rejected.status, PackageStatus::Rejected);
        assert_eq!(rejected.host.map(|h| h.id), Some(host.id));
        assert!(dash.pending_packages().is_empty());

        let err = dash
            .set_package_status(&admin.principal(), package.id, PackageStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn platform_stats_count_roles_and_approvals() {
        let store = MockRecordStore::new();
        let admin = fixtures::user(Role::SuperAdmin);
        let host = fixtures::user(Role::Host);
        for user in [&admin, &host, &fixtures::user(Role::Guest)] {
            store.seed_record(Table::Users, user);
        }
        store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Pending));
        store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Approved));

        let mut dash = dashboard(&store);
        dash.refresh(&admin.principal()).await.unwrap();
        let stats = dash.compute_platform_stats();
        assert_eq!(stats.total_users(), 3);
        assert_eq!(stats.users_by_role.hosts, 1);
        assert_eq!(stats.pending_approvals(), 1);
        assert_eq!(stats.total_bookings, 0);
    }
}

//! Guest dashboard.
//!
//! Browse approved packages, keep a wishlist, and place bookings.

use crate::environment::DashboardEnvironment;
use crate::repository::Repository;
use crate::view::{GuestView, log_failure};
use basecamp_core::providers::RecordStore;
use basecamp_core::{
    Booking, Filter, MarketplaceError, Package, PackageId, Principal, Result, Role, StoreError,
    Table, WishlistEntry, WishlistId, workflow,
};

fn authorize(principal: &Principal, action: &'static str) -> Result<()> {
    if principal.has_role(Role::Guest) {
        Ok(())
    } else {
        Err(MarketplaceError::unauthorized(
            action,
            format!("role `{}` has no guest dashboard", principal.role),
        ))
    }
}

/// Controller behind the guest dashboard.
///
/// Holds a [`GuestView`] snapshot. Fetches replace the snapshot only when
/// they succeed; mutations patch it from what the store returned.
#[derive(Debug)]
pub struct GuestDashboard<S>
where
    S: RecordStore + Clone,
{
    env: DashboardEnvironment<S>,
    view: GuestView,
}

impl<S> GuestDashboard<S>
where
    S: RecordStore + Clone,
{
    /// Creates a dashboard with an empty snapshot.
    #[must_use]
    pub fn new(env: DashboardEnvironment<S>) -> Self {
        Self {
            env,
            view: GuestView::default(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub const fn view(&self) -> &GuestView {
        &self.view
    }

    fn repo(&self) -> Repository<'_, S> {
        Repository::new(&self.env.store)
    }

    /// Fetch the approved packages, newest first, with their hosts.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-guests; store failures (snapshot kept).
    pub async fn list_approved_packages(&mut self, principal: &Principal) -> Result<&[Package]> {
        const OP: &str = "list packages";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().approved_packages().await;
        self.view.packages = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.packages)
    }

    /// Fetch the guest's own bookings, newest first, with their packages.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-guests; store failures (snapshot kept).
    pub async fn list_own_bookings(&mut self, principal: &Principal) -> Result<&[Booking]> {
        const OP: &str = "list bookings";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().guest_bookings(principal.id).await;
        self.view.bookings = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.bookings)
    }

    /// Fetch the guest's own wishlist, with packages.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-guests; store failures (snapshot kept).
    pub async fn list_own_wishlist(&mut self, principal: &Principal) -> Result<&[WishlistEntry]> {
        const OP: &str = "list wishlist";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.repo().guest_wishlist(principal.id).await;
        self.view.wishlist = self.view.load.settle(OP, outcome)?;
        Ok(&self.view.wishlist)
    }

    /// Re-fetch packages, bookings and wishlist.
    ///
    /// The snapshot is replaced only if all three fetches succeed.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-guests; store failures (snapshot kept).
    pub async fn refresh(&mut self, principal: &Principal) -> Result<()> {
        const OP: &str = "refresh guest dashboard";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        self.view.load.begin();
        let outcome = self.fetch_all(principal).await;
        let (packages, bookings, wishlist) = self.view.load.settle(OP, outcome)?;
        self.view.packages = packages;
        self.view.bookings = bookings;
        self.view.wishlist = wishlist;
        Ok(())
    }

    async fn fetch_all(
        &self,
        principal: &Principal,
    ) -> Result<(Vec<Package>, Vec<Booking>, Vec<WishlistEntry>)> {
        let repo = self.repo();
        Ok((
            repo.approved_packages().await?,
            repo.guest_bookings(principal.id).await?,
            repo.guest_wishlist(principal.id).await?,
        ))
    }

    /// Save `package_id` to the guest's wishlist.
    ///
    /// Idempotent: a package already in the snapshot is returned without a
    /// store call, and an entry the store already holds is adopted.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-guests; store failures.
    pub async fn add_to_wishlist(
        &mut self,
        principal: &Principal,
        package_id: PackageId,
    ) -> Result<WishlistEntry> {
        const OP: &str = "add to wishlist";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        if let Some(entry) = self
            .view
            .wishlist
            .iter()
            .find(|e| e.guest_id == principal.id && e.package_id == package_id)
        {
            tracing::debug!(package = %package_id, "already on wishlist");
            return Ok(entry.clone());
        }

        let entry = WishlistEntry {
            id: WishlistId::new(),
            guest_id: principal.id,
            package_id,
            created_at: self.env.clock.now(),
            package: None,
        };

        let mut saved = match self.repo().insert(Table::Wishlist, &entry).await {
            Ok(saved) => saved,
            Err(MarketplaceError::Store(StoreError::UniqueViolation(_))) => self
                .repo()
                .wishlist_entry(principal.id, package_id)
                .await
                .and_then(|found| {
                    found.ok_or_else(|| MarketplaceError::NotFound {
                        entity: "wishlist entry",
                        id: package_id.to_string(),
                    })
                })
                .inspect_err(|e| log_failure(OP, e))?,
            Err(e) => {
                log_failure(OP, &e);
                return Err(e);
            }
        };

        if saved.package.is_none() {
            saved.package = self.view.packages.iter().find(|p| p.id == package_id).cloned();
        }
        tracing::info!(guest = %principal.id, package = %package_id, "saved to wishlist");
        self.view.wishlist.insert(0, saved.clone());
        Ok(saved)
    }

    /// Remove `package_id` from the guest's wishlist.
    ///
    /// Returns whether an entry was removed; removing an absent entry is
    /// not an error.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-guests; store failures (snapshot kept).
    pub async fn remove_from_wishlist(
        &mut self,
        principal: &Principal,
        package_id: PackageId,
    ) -> Result<bool> {
        const OP: &str = "remove from wishlist";
        authorize(principal, OP).inspect_err(|e| log_failure(OP, e))?;

        let filters = [
            Filter::eq("guest_id", principal.id),
            Filter::eq("package_id", package_id),
        ];
        let removed = self
            .repo()
            .delete(Table::Wishlist, &filters)
            .await
            .inspect_err(|e| log_failure(OP, e))?;

        self.view
            .wishlist
            .retain(|e| !(e.guest_id == principal.id && e.package_id == package_id));
        tracing::info!(guest = %principal.id, package = %package_id, removed, "wishlist updated");
        Ok(removed > 0)
    }

    /// Book `package` for `people_count` people over `duration_days` days.
    ///
    /// The booking starts `pending`/`pending` with a frozen total and is
    /// prepended to the snapshot.
    ///
    /// # Errors
    ///
    /// `Unauthorized` / `Validation` before any store call; store failures.
    pub async fn create_booking(
        &mut self,
        principal: &Principal,
        package: &Package,
        people_count: u32,
        duration_days: u32,
    ) -> Result<Booking> {
        const OP: &str = "create booking";
        let booking = workflow::new_booking(
            principal,
            package,
            people_count,
            duration_days,
            self.env.clock.as_ref(),
        )
        .inspect_err(|e| log_failure(OP, e))?;

        let mut saved: Booking = self
            .repo()
            .insert(Table::Bookings, &booking)
            .await
            .inspect_err(|e| log_failure(OP, e))?;
        saved.package = Some(package.clone());

        tracing::info!(
            booking = %saved.id,
            package = %package.id,
            total = %saved.total_amount,
            "booking placed"
        );
        self.view.bookings.insert(0, saved.clone());
        Ok(saved)
    }

    /// Whether `package_id` is on the wishlist snapshot.
    #[must_use]
    pub fn is_in_wishlist(&self, package_id: PackageId) -> bool {
        self.view.wishlist.iter().any(|e| e.package_id == package_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use basecamp_core::PackageStatus;
    use basecamp_testing::{MockRecordStore, StoreCall, fixtures, test_clock};
    use std::sync::Arc;

    fn dashboard(store: &MockRecordStore) -> GuestDashboard<MockRecordStore> {
        GuestDashboard::new(DashboardEnvironment::new(store.clone(), Arc::new(test_clock())))
    }

    #[tokio::test]
    async fn hosts_cannot_use_the_guest_dashboard() {
        let store = MockRecordStore::new();
        let host = fixtures::user(Role::Host).principal();

        let err = dashboard(&store).list_approved_packages(&host).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::Unauthorized { .. }));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn wishlist_conflict_adopts_the_stored_entry() {
        let store = MockRecordStore::new();
        let guest = fixtures::user(Role::Guest);
        let host = fixtures::user(Role::Host);
        let package = fixtures::package(&host, PackageStatus::Approved);
        store.seed_record(Table::Packages, &package);

        // Saved from another device; this dashboard's snapshot is empty.
        let mut other = dashboard(&store);
        let first = other.add_to_wishlist(&guest.principal(), package.id).await.unwrap();

        let mut dash = dashboard(&store);
        let adopted = dash.add_to_wishlist(&guest.principal(), package.id).await.unwrap();
        assert_eq!(adopted.id, first.id);
        assert_eq!(adopted.package.map(|p| p.id), Some(package.id));
        assert_eq!(store.rows(Table::Wishlist).len(), 1);
        assert!(dash.is_in_wishlist(package.id));
    }

    #[tokio::test]
    async fn failed_booking_insert_leaves_snapshot_alone() {
        let store = MockRecordStore::new();
        let guest = fixtures::user(Role::Guest).principal();
        let host = fixtures::user(Role::Host);
        let package = fixtures::package(&host, PackageStatus::Approved);
        store.fail_next(StoreError::RequestFailed("connection reset".into()));

        let mut dash = dashboard(&store);
        let err = dash.create_booking(&guest, &package, 2, 3).await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(dash.view().bookings.is_empty());
        assert_eq!(store.calls(), vec![StoreCall::Insert(Table::Bookings)]);
    }
}

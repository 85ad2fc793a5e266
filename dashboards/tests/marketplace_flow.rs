//! End-to-end marketplace flows across the three dashboards.
//!
//! All dashboards share one in-memory store, the way the hosted store is
//! shared by every signed-in user.

#![allow(clippy::unwrap_used)]

use basecamp_core::providers::RecordStore;
use basecamp_core::{
    BookingStatus, Filter, MarketplaceError, Package, PackageStatus, PaymentStatus, Role, Table,
    User,
};
use basecamp_dashboards::{
    DashboardEnvironment, GuestDashboard, HostDashboard, SuperAdminDashboard,
};
use basecamp_testing::{MockRecordStore, StoreCall, fixtures, init_tracing, stepping_clock};
use serde_json::json;
use std::sync::Arc;

struct Marketplace {
    store: MockRecordStore,
    env: DashboardEnvironment<MockRecordStore>,
    host: User,
    guest: User,
    admin: User,
}

impl Marketplace {
    fn new() -> Self {
        init_tracing();
        let store = MockRecordStore::new();
        let env = DashboardEnvironment::new(store.clone(), Arc::new(stepping_clock()));
        let host = fixtures::user(Role::Host);
        let guest = fixtures::user(Role::Guest);
        let admin = fixtures::user(Role::SuperAdmin);
        for user in [&host, &guest, &admin] {
            store.seed_record(Table::Users, user);
        }
        Self {
            store,
            env,
            host,
            guest,
            admin,
        }
    }

    fn host_dashboard(&self) -> HostDashboard<MockRecordStore> {
        HostDashboard::new(self.env.clone())
    }

    fn guest_dashboard(&self) -> GuestDashboard<MockRecordStore> {
        GuestDashboard::new(self.env.clone())
    }

    fn admin_dashboard(&self) -> SuperAdminDashboard<MockRecordStore> {
        SuperAdminDashboard::new(self.env.clone())
    }

    /// Draft, submit and approve the "Trek" package.
    async fn approved_trek(&self) -> Package {
        let mut host = self.host_dashboard();
        let draft = host
            .create_package(&self.host.principal(), fixtures::trek_draft())
            .await
            .unwrap();
        host.submit_for_approval(&self.host.principal(), draft.id)
            .await
            .unwrap();

        let mut admin = self.admin_dashboard();
        admin.list_all_packages(&self.admin.principal()).await.unwrap();
        admin
            .set_package_status(&self.admin.principal(), draft.id, PackageStatus::Approved)
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn package_goes_from_draft_to_guest_listing() {
    let market = Marketplace::new();
    let mut host = market.host_dashboard();

    let trek = host
        .create_package(&market.host.principal(), fixtures::trek_draft())
        .await
        .unwrap();
    assert_eq!(trek.status, PackageStatus::Draft);
    assert_eq!(trek.price.units(), 500);

    let submitted = host
        .submit_for_approval(&market.host.principal(), trek.id)
        .await
        .unwrap();
    assert_eq!(submitted.status, PackageStatus::Pending);
    assert_eq!(host.view().packages[0].status, PackageStatus::Pending);

    // Not visible to guests until approved.
    let mut guest = market.guest_dashboard();
    assert!(guest
        .list_approved_packages(&market.guest.principal())
        .await
        .unwrap()
        .is_empty());

    let mut admin = market.admin_dashboard();
    admin.refresh(&market.admin.principal()).await.unwrap();
    assert_eq!(admin.pending_packages().len(), 1);

    let approved = admin
        .set_package_status(&market.admin.principal(), trek.id, PackageStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, PackageStatus::Approved);
    assert!(admin.pending_packages().is_empty());

    let listed = guest
        .list_approved_packages(&market.guest.principal())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, trek.id);
    assert_eq!(listed[0].host.as_ref().map(|h| h.id), Some(market.host.id));
}

#[tokio::test]
async fn booking_freezes_the_total() {
    let market = Marketplace::new();
    let trek = market.approved_trek().await;
    let mut guest = market.guest_dashboard();

    let booking = guest
        .create_booking(&market.guest.principal(), &trek, 2, 3)
        .await
        .unwrap();
    assert_eq!(booking.total_amount.units(), 3000);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(guest.view().bookings.len(), 1);

    // A later price change does not touch the stored total.
    market
        .store
        .update(Table::Packages, &[Filter::eq("id", trek.id)], json!({ "price": 900 }))
        .await
        .unwrap();
    let bookings = guest
        .list_own_bookings(&market.guest.principal())
        .await
        .unwrap();
    assert_eq!(bookings[0].total_amount.units(), 3000);
    assert_eq!(bookings[0].package.as_ref().map(|p| p.price.units()), Some(900));
}

#[tokio::test]
async fn host_confirms_a_booking_once() {
    let market = Marketplace::new();
    let trek = market.approved_trek().await;
    let booking = market
        .guest_dashboard()
        .create_booking(&market.guest.principal(), &trek, 2, 3)
        .await
        .unwrap();

    let mut host = market.host_dashboard();
    let incoming = host
        .list_bookings_for_own_packages(&market.host.principal())
        .await
        .unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].guest.as_ref().map(|g| g.id), Some(market.guest.id));

    let confirmed = host
        .set_booking_status(&market.host.principal(), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(confirmed.payment_status, PaymentStatus::Pending);
    assert_eq!(host.view().bookings[0].status, BookingStatus::Confirmed);
    assert_eq!(host.compute_host_stats().confirmed_bookings, 1);

    market.store.clear_calls();
    let again = host
        .set_booking_status(&market.host.principal(), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(again, MarketplaceError::InvalidTransition { .. }));
    assert!(market.store.calls().is_empty());
    assert_eq!(host.view().bookings[0].status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn wishlist_round_trip_keeps_one_entry() {
    let market = Marketplace::new();
    let trek = market.approved_trek().await;
    let mut guest = market.guest_dashboard();
    let principal = market.guest.principal();

    guest.refresh(&principal).await.unwrap();
    assert!(!guest.is_in_wishlist(trek.id));

    guest.add_to_wishlist(&principal, trek.id).await.unwrap();
    guest.add_to_wishlist(&principal, trek.id).await.unwrap();
    assert!(guest.is_in_wishlist(trek.id));
    assert_eq!(guest.view().wishlist.len(), 1);
    assert_eq!(market.store.rows(Table::Wishlist).len(), 1);

    assert!(guest.remove_from_wishlist(&principal, trek.id).await.unwrap());
    assert!(!guest.is_in_wishlist(trek.id));
    assert!(market.store.rows(Table::Wishlist).is_empty());

    // Removing again is a no-op.
    assert!(!guest.remove_from_wishlist(&principal, trek.id).await.unwrap());
}

#[tokio::test]
async fn host_stats_count_only_paid_revenue() {
    let market = Marketplace::new();
    let trek = market.approved_trek().await;
    let draft = fixtures::package(&market.host, PackageStatus::Draft);
    market.store.seed_record(Table::Packages, &draft);
    market.store.seed_record(
        Table::Bookings,
        &fixtures::booking(&market.guest, &trek, 2, BookingStatus::Confirmed, PaymentStatus::Paid),
    );
    market.store.seed_record(
        Table::Bookings,
        &fixtures::booking(&market.guest, &trek, 4, BookingStatus::Pending, PaymentStatus::Pending),
    );

    let mut host = market.host_dashboard();
    host.refresh(&market.host.principal()).await.unwrap();
    let stats = host.compute_host_stats();

    assert_eq!(stats.total_revenue.units(), 3000);
    assert_eq!(stats.total_bookings, 2);
    assert_eq!(stats.confirmed_bookings, 1);
    assert_eq!(stats.total_packages, 2);
    assert_eq!(stats.packages_by_status.get(PackageStatus::Approved), 1);
    assert_eq!(stats.packages_by_status.get(PackageStatus::Draft), 1);
    assert_eq!(stats.packages_by_status.get(PackageStatus::Rejected), 0);

    // Two selects: packages, then bookings scoped to them.
    assert!(market.store.calls().ends_with(&[
        StoreCall::Select(Table::Packages),
        StoreCall::Select(Table::Bookings),
    ]));
}

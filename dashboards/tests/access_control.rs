//! Rejections: wrong role, wrong owner, bad input, failing store.
//!
//! Every rejection raised before the store is consulted must leave the
//! call log untouched.

#![allow(clippy::unwrap_used)]

use basecamp_core::{
    BookingStatus, MarketplaceError, PackageStatus, PaymentStatus, Role, StoreError, Table,
};
use basecamp_dashboards::{
    DashboardEnvironment, GuestDashboard, HostDashboard, LoadState, SuperAdminDashboard,
};
use basecamp_testing::{MockRecordStore, StoreCall, fixtures, init_tracing, test_clock};
use std::sync::Arc;

fn env(store: &MockRecordStore) -> DashboardEnvironment<MockRecordStore> {
    init_tracing();
    DashboardEnvironment::new(store.clone(), Arc::new(test_clock()))
}

#[tokio::test]
async fn only_superadmins_review_packages() {
    let store = MockRecordStore::new();
    let host = fixtures::user(Role::Host);
    let package = fixtures::package(&host, PackageStatus::Pending);
    store.seed_record(Table::Packages, &package);

    let mut dash = SuperAdminDashboard::new(env(&store));
    for role in [Role::Host, Role::Guest] {
        let actor = fixtures::user(role).principal();
        let err = dash
            .set_package_status(&actor, package.id, PackageStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::Unauthorized { .. }));
    }
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn submitting_a_non_draft_is_rejected_without_a_store_call() {
    let store = MockRecordStore::new();
    let host = fixtures::user(Role::Host);
    store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Approved));

    let mut dash = HostDashboard::new(env(&store));
    let package_id = dash.list_own_packages(&host.principal()).await.unwrap()[0].id;
    store.clear_calls();

    let err = dash
        .submit_for_approval(&host.principal(), package_id)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::InvalidTransition { .. }));
    assert!(store.calls().is_empty());
    assert_eq!(dash.view().packages[0].status, PackageStatus::Approved);
}

#[tokio::test]
async fn hosts_cannot_touch_each_others_listings() {
    let store = MockRecordStore::new();
    let owner = fixtures::user(Role::Host);
    let rival = fixtures::user(Role::Host);
    let guest = fixtures::user(Role::Guest);
    let draft = fixtures::package(&owner, PackageStatus::Draft);
    let listed = fixtures::package(&owner, PackageStatus::Approved);
    let booking = fixtures::booking(
        &guest,
        &listed,
        2,
        BookingStatus::Pending,
        PaymentStatus::Pending,
    );
    store.seed_record(Table::Packages, &draft);
    store.seed_record(Table::Packages, &listed);
    store.seed_record(Table::Bookings, &booking);

    let mut dash = HostDashboard::new(env(&store));

    let err = dash
        .submit_for_approval(&rival.principal(), draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::Unauthorized { .. }));

    let err = dash
        .set_booking_status(&rival.principal(), booking.id, BookingStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::Unauthorized { .. }));

    assert!(
        !store
            .calls()
            .iter()
            .any(|call| matches!(call, StoreCall::Update(_)))
    );
    assert_eq!(store.rows(Table::Bookings)[0]["status"], "pending");
}

#[tokio::test]
async fn booking_input_is_validated_before_the_store() {
    let store = MockRecordStore::new();
    let host = fixtures::user(Role::Host);
    let guest = fixtures::user(Role::Guest).principal();
    let approved = fixtures::package(&host, PackageStatus::Approved);
    let pending = fixtures::package(&host, PackageStatus::Pending);
    let mut dash = GuestDashboard::new(env(&store));

    let too_many = dash.create_booking(&guest, &approved, 5, 3).await.unwrap_err();
    assert!(matches!(too_many, MarketplaceError::Validation(_)));

    let no_days = dash.create_booking(&guest, &approved, 2, 0).await.unwrap_err();
    assert!(matches!(no_days, MarketplaceError::Validation(_)));

    let unlisted = dash.create_booking(&guest, &pending, 2, 3).await.unwrap_err();
    assert!(matches!(unlisted, MarketplaceError::Validation(_)));

    let as_host = dash
        .create_booking(&host.principal(), &approved, 2, 3)
        .await
        .unwrap_err();
    assert!(matches!(as_host, MarketplaceError::Unauthorized { .. }));

    assert!(store.calls().is_empty());
    assert!(dash.view().bookings.is_empty());
}

#[tokio::test]
async fn failed_fetch_keeps_what_was_shown() {
    let store = MockRecordStore::new();
    let host = fixtures::user(Role::Host);
    let guest = fixtures::user(Role::Guest).principal();
    store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Approved));

    let mut dash = GuestDashboard::new(env(&store));
    dash.refresh(&guest).await.unwrap();
    assert_eq!(dash.view().load, LoadState::Loaded);
    assert_eq!(dash.view().packages.len(), 1);

    store.fail_next(StoreError::Status {
        status: 503,
        message: "upstream unavailable".into(),
    });
    let err = dash.list_approved_packages(&guest).await.unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(dash.view().packages.len(), 1);
    assert!(matches!(dash.view().load, LoadState::Failed(ref msg) if msg.contains("503")));

    dash.list_approved_packages(&guest).await.unwrap();
    assert_eq!(dash.view().load, LoadState::Loaded);
}

#[tokio::test]
async fn failed_mutation_keeps_the_snapshot() {
    let store = MockRecordStore::new();
    let host = fixtures::user(Role::Host);
    let admin = fixtures::user(Role::SuperAdmin);
    let package = fixtures::package(&host, PackageStatus::Pending);
    store.seed_record(Table::Packages, &package);

    let mut dash = SuperAdminDashboard::new(env(&store));
    dash.list_all_packages(&admin.principal()).await.unwrap();

    store.fail_next(StoreError::RequestFailed("connection reset".into()));
    let err = dash
        .set_package_status(&admin.principal(), package.id, PackageStatus::Approved)
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(dash.pending_packages().len(), 1);
    assert_eq!(store.rows(Table::Packages)[0]["status"], "pending");
}

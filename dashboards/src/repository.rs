//! Typed access to the record store.
//!
//! The store speaks JSON rows; the dashboards speak domain records. Every
//! read the dashboards make is spelled out here once, so the composite
//! queries (package + host, booking + package + guest, wishlist + package)
//! live in one place.

use basecamp_core::providers::RecordStore;
use basecamp_core::subscription::Subscription;
use basecamp_core::{
    Booking, BookingId, Filter, MarketplaceError, Package, PackageId, PackageStatus, Query,
    Relation, Result, StoreError, Table, User, UserId, WishlistEntry,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a store row into a record.
///
/// # Errors
///
/// `StoreError::Decode` naming the table when the row has the wrong shape.
pub fn decode<T: DeserializeOwned>(table: Table, row: Value) -> std::result::Result<T, StoreError> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode {
        table: table.name().to_string(),
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(table: Table, record: &T) -> std::result::Result<Value, StoreError> {
    serde_json::to_value(record)
        .map_err(|e| StoreError::Internal(format!("cannot encode {table} row: {e}")))
}

/// Record-typed view of a [`RecordStore`].
#[derive(Debug)]
pub struct Repository<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> Repository<'a, S> {
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run `query` and decode every row.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn fetch<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        let rows = self.store.select(query).await?;
        tracing::debug!(table = %query.table, rows = rows.len(), "fetched");
        rows.into_iter()
            .map(|row| decode(query.table, row).map_err(MarketplaceError::from))
            .collect()
    }

    /// First row of `query`, if any.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn fetch_first<T: DeserializeOwned>(&self, query: Query) -> Result<Option<T>> {
        Ok(self.fetch(&query.limit(1)).await?.into_iter().next())
    }

    /// Insert `record` and decode the stored row.
    ///
    /// # Errors
    ///
    /// Store failures, including `StoreError::UniqueViolation`.
    pub async fn insert<T: Serialize + DeserializeOwned>(
        &self,
        table: Table,
        record: &T,
    ) -> Result<T> {
        let stored = self.store.insert(table, encode(table, record)?).await?;
        Ok(decode(table, stored)?)
    }

    /// Apply `patch` to the rows matching `filters` and decode the result.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<T>> {
        let rows = self.store.update(table, filters, patch).await?;
        rows.into_iter()
            .map(|row| decode(table, row).map_err(MarketplaceError::from))
            .collect()
    }

    /// Delete the rows matching `filters`.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub async fn delete(&self, table: Table, filters: &[Filter]) -> Result<usize> {
        Ok(self.store.delete(table, filters).await?)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Guest reads
    // ═══════════════════════════════════════════════════════════════════

    /// Approved packages with their hosts, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn approved_packages(&self) -> Result<Vec<Package>> {
        let query = Query::from(Table::Packages)
            .eq("status", PackageStatus::Approved)
            .expand(Relation::PACKAGE_HOST)
            .newest_first();
        self.fetch(&query).await
    }

    /// A guest's bookings with their packages, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn guest_bookings(&self, guest: UserId) -> Result<Vec<Booking>> {
        let query = Query::from(Table::Bookings)
            .eq("guest_id", guest)
            .expand(Relation::PACKAGE)
            .newest_first();
        self.fetch(&query).await
    }

    /// A guest's wishlist with packages, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn guest_wishlist(&self, guest: UserId) -> Result<Vec<WishlistEntry>> {
        let query = Query::from(Table::Wishlist)
            .eq("guest_id", guest)
            .expand(Relation::PACKAGE)
            .newest_first();
        self.fetch(&query).await
    }

    /// The guest's wishlist entry for `package`, if saved.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn wishlist_entry(
        &self,
        guest: UserId,
        package: PackageId,
    ) -> Result<Option<WishlistEntry>> {
        let query = Query::from(Table::Wishlist)
            .eq("guest_id", guest)
            .eq("package_id", package)
            .expand(Relation::PACKAGE);
        self.fetch_first(query).await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Host reads
    // ═══════════════════════════════════════════════════════════════════

    /// A host's packages, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn host_packages(&self, host: UserId) -> Result<Vec<Package>> {
        let query = Query::from(Table::Packages).eq("host_id", host).newest_first();
        self.fetch(&query).await
    }

    /// Bookings against any of `packages`, with package and guest, newest
    /// first. No store call is made for an empty package list.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn bookings_for_packages(&self, packages: &[PackageId]) -> Result<Vec<Booking>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::from(Table::Bookings)
            .filter(Filter::one_of("package_id", packages.iter().copied()))
            .expand(Relation::PACKAGE)
            .expand(Relation::GUEST)
            .newest_first();
        self.fetch(&query).await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Superadmin reads
    // ═══════════════════════════════════════════════════════════════════

    /// Every package with its host, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn all_packages(&self) -> Result<Vec<Package>> {
        let query = Query::from(Table::Packages)
            .expand(Relation::PACKAGE_HOST)
            .newest_first();
        self.fetch(&query).await
    }

    /// Every booking with package and guest, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn all_bookings(&self) -> Result<Vec<Booking>> {
        let query = Query::from(Table::Bookings)
            .expand(Relation::PACKAGE)
            .expand(Relation::GUEST)
            .newest_first();
        self.fetch(&query).await
    }

    /// Every user, newest first.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn all_users(&self) -> Result<Vec<User>> {
        self.fetch(&Query::from(Table::Users).newest_first()).await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Point reads
    // ═══════════════════════════════════════════════════════════════════

    /// One package by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such package exists, plus store failures.
    pub async fn package(&self, id: PackageId) -> Result<Package> {
        self.fetch_first(Query::from(Table::Packages).eq("id", id))
            .await?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "package",
                id: id.to_string(),
            })
    }

    /// One booking by ID, with its package.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such booking exists, plus store failures.
    pub async fn booking(&self, id: BookingId) -> Result<Booking> {
        let query = Query::from(Table::Bookings)
            .eq("id", id)
            .expand(Relation::PACKAGE);
        self.fetch_first(query)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "booking",
                id: id.to_string(),
            })
    }

    /// The caller's subscription row, if the provider has written one.
    ///
    /// The subscriptions view has no user column; it only returns the row
    /// of the user the store is authenticated as.
    ///
    /// # Errors
    ///
    /// Store failures and undecodable rows.
    pub async fn subscription(&self) -> Result<Option<Subscription>> {
        self.fetch_first(Query::from(Table::Subscriptions)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use basecamp_core::Role;
    use basecamp_testing::{MockRecordStore, StoreCall, fixtures};

    #[tokio::test]
    async fn undecodable_rows_name_their_table() {
        let store = MockRecordStore::new();
        store.seed(Table::Users, [serde_json::json!({"id": "not-a-uuid"})]);

        let err = Repository::new(&store).all_users().await.unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::Store(StoreError::Decode { ref table, .. }) if table == "users"
        ));
    }

    #[tokio::test]
    async fn missing_host_decodes_as_none() {
        let store = MockRecordStore::new();
        let host = fixtures::user(Role::Host);
        store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Approved));

        let packages = Repository::new(&store).approved_packages().await.unwrap();
        assert_eq!(packages.len(), 1);
        assert!(packages[0].host.is_none());
    }

    #[tokio::test]
    async fn numeric_prices_with_zero_fraction_decode() {
        let store = MockRecordStore::new();
        let host = fixtures::user(Role::Host);
        store.seed_record(Table::Packages, &fixtures::package(&host, PackageStatus::Approved));
        let mut row =
            serde_json::to_value(fixtures::package(&host, PackageStatus::Approved)).unwrap();
        row["price"] = serde_json::json!(500.0);
        store.seed(Table::Packages, [row]);

        let packages = Repository::new(&store).approved_packages().await.unwrap();
        assert_eq!(packages.len(), 2);
        assert!(packages.iter().all(|p| p.price.units() == 500));
    }

    #[tokio::test]
    async fn fractional_prices_fail_with_a_decode_reason() {
        let store = MockRecordStore::new();
        let host = fixtures::user(Role::Host);
        let mut row =
            serde_json::to_value(fixtures::package(&host, PackageStatus::Approved)).unwrap();
        row["price"] = serde_json::json!(499.5);
        store.seed(Table::Packages, [row]);

        let err = Repository::new(&store).approved_packages().await.unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::Store(StoreError::Decode { ref reason, .. })
                if reason.contains("not a whole number")
        ));
    }

    #[tokio::test]
    async fn subscription_read_relies_on_the_store_scope() {
        let store = MockRecordStore::new();
        store.seed(
            Table::Subscriptions,
            [serde_json::json!({"subscription_status": "active", "cancel_at_period_end": false})],
        );

        let row = Repository::new(&store).subscription().await.unwrap();
        assert!(row.is_some_and(|s| s.is_active()));
        assert_eq!(store.calls(), vec![StoreCall::Select(Table::Subscriptions)]);
    }

    #[tokio::test]
    async fn no_packages_means_no_booking_query() {
        let store = MockRecordStore::new();
        let bookings = Repository::new(&store).bookings_for_packages(&[]).await.unwrap();
        assert!(bookings.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn point_reads_report_missing_records() {
        let store = MockRecordStore::new();
        let err = Repository::new(&store).package(PackageId::new()).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::NotFound { entity: "package", .. }));
        assert_eq!(store.calls(), vec![StoreCall::Select(Table::Packages)]);
    }
}

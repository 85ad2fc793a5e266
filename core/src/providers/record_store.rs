//! Record store trait.

use crate::error::StoreError;
use crate::query::{Filter, Query, Table};
use serde_json::Value;

/// Generic remote record store.
///
/// Rows travel as JSON objects. Relation expansion requested by a
/// [`Query`] embeds the related row under the relation's alias, or `null`
/// when the related row is missing.
pub trait RecordStore: Send + Sync {
    /// Rows of `query.table` matching every filter, relations expanded.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store rejects the query.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Insert `row` and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request fails
    /// - A unique constraint is violated → `StoreError::UniqueViolation`
    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;

    /// Merge `patch` into every row matching `filters`; returns the updated rows.
    ///
    /// Zero matching rows is not an error; callers decide what it means.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Delete every row matching `filters`; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<usize, StoreError>;
}

//! In-memory record store.
//!
//! Behaves like the hosted store for the operations the dashboards use:
//! conjunctive filters, `created_at` ordering, relation expansion, unique
//! keys. Every call is logged so tests can assert that a rejected
//! operation never reached the store.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use basecamp_core::StoreError;
use basecamp_core::providers::RecordStore;
use basecamp_core::query::{Direction, Filter, Query, Table};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A logged store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    /// `select` on a table.
    Select(Table),
    /// `insert` into a table.
    Insert(Table),
    /// `update` of a table.
    Update(Table),
    /// `delete` from a table.
    Delete(Table),
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<Table, Vec<Value>>,
    calls: Vec<StoreCall>,
    failures: VecDeque<StoreError>,
}

/// Mock record store.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MockRecordStore {
    inner: Arc<Mutex<Inner>>,
}

impl MockRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw rows to `table`.
    pub fn seed(&self, table: Table, rows: impl IntoIterator<Item = Value>) {
        self.inner
            .lock()
            .unwrap()
            .tables
            .entry(table)
            .or_default()
            .extend(rows);
    }

    /// Append a serializable record to `table`.
    pub fn seed_record<T: Serialize>(&self, table: Table, record: &T) {
        self.seed(table, [serde_json::to_value(record).unwrap()]);
    }

    /// Current rows of `table`, without relation expansion.
    #[must_use]
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Every call made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Forget the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Make the next call fail with `error`. Queued failures are consumed
    /// in order, one per call.
    pub fn fail_next(&self, error: StoreError) {
        self.inner.lock().unwrap().failures.push_back(error);
    }

    fn begin(&self, call: StoreCall) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Internal("mock store lock poisoned".into()))?;
        inner.calls.push(call);
        match inner.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(inner),
        }
    }
}

/// Column sets that must be unique per table.
fn unique_keys(table: Table) -> &'static [&'static [&'static str]] {
    match table {
        Table::Wishlist => &[&["id"], &["guest_id", "package_id"]],
        Table::Subscriptions => &[],
        Table::Packages | Table::Bookings | Table::Users => &[&["id"]],
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn merge(row: &mut Value, patch: &Value) {
    if let (Value::Object(row), Value::Object(patch)) = (row, patch) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}

impl RecordStore for MockRecordStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let inner = self.begin(StoreCall::Select(query.table))?;
        let empty = Vec::new();
        let rows = inner.tables.get(&query.table).unwrap_or(&empty);

        let mut selected: Vec<Value> = rows.iter().filter(|r| query.matches(r)).cloned().collect();

        if let Some(order) = query.order {
            selected.sort_by(|a, b| {
                let ord = compare(a.get(order.column), b.get(order.column));
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            selected.truncate(limit);
        }

        for row in &mut selected {
            for relation in &query.relations {
                let related = row.get(relation.column).and_then(|key| {
                    inner
                        .tables
                        .get(&relation.table)
                        .and_then(|t| t.iter().find(|r| r.get("id") == Some(key)))
                        .cloned()
                });
                if let Value::Object(map) = row {
                    map.insert(relation.alias.to_string(), related.unwrap_or(Value::Null));
                }
            }
        }

        Ok(selected)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let mut inner = self.begin(StoreCall::Insert(table))?;
        let rows = inner.tables.entry(table).or_default();

        for key in unique_keys(table) {
            let clash = rows.iter().any(|existing| {
                key.iter().all(|column| {
                    row.get(column).is_some() && existing.get(column) == row.get(column)
                })
            });
            if clash {
                return Err(StoreError::UniqueViolation(format!(
                    "duplicate key ({}) in {table}",
                    key.join(", ")
                )));
            }
        }

        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let mut inner = self.begin(StoreCall::Update(table))?;
        let mut updated = Vec::new();
        if let Some(rows) = inner.tables.get_mut(&table) {
            for row in rows.iter_mut().filter(|r| filters.iter().all(|f| f.matches(r))) {
                merge(row, &patch);
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<usize, StoreError> {
        let mut inner = self.begin(StoreCall::Delete(table))?;
        let Some(rows) = inner.tables.get_mut(&table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !filters.iter().all(|f| f.matches(r)));
        Ok(before - rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecamp_core::Relation;
    use serde_json::json;

    #[tokio::test]
    async fn expands_relations_and_nulls_missing_ones() {
        let store = MockRecordStore::new();
        store.seed(Table::Users, [json!({"id": "h1", "role": "host"})]);
        store.seed(
            Table::Packages,
            [
                json!({"id": "p1", "host_id": "h1", "created_at": "2025-01-01T00:00:00Z"}),
                json!({"id": "p2", "host_id": "gone", "created_at": "2025-01-02T00:00:00Z"}),
            ],
        );

        let rows = store
            .select(&Query::from(Table::Packages).expand(Relation::PACKAGE_HOST).newest_first())
            .await
            .unwrap();

        assert_eq!(rows[0]["id"], "p2");
        assert!(rows[0]["host"].is_null());
        assert_eq!(rows[1]["host"]["role"], "host");
    }

    #[tokio::test]
    async fn enforces_unique_wishlist_pairs() {
        let store = MockRecordStore::new();
        let entry = json!({"id": "w1", "guest_id": "g1", "package_id": "p1"});
        store.insert(Table::Wishlist, entry).await.unwrap();

        let again = json!({"id": "w2", "guest_id": "g1", "package_id": "p1"});
        let err = store.insert(Table::Wishlist, again).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(store.rows(Table::Wishlist).len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_honour_filters() {
        let store = MockRecordStore::new();
        store.seed(
            Table::Bookings,
            [
                json!({"id": "b1", "status": "pending"}),
                json!({"id": "b2", "status": "pending"}),
            ],
        );

        let updated = store
            .update(
                Table::Bookings,
                &[Filter::eq("id", "b1"), Filter::eq("status", "pending")],
                json!({"status": "confirmed"}),
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], "confirmed");

        let removed = store.delete(Table::Bookings, &[Filter::eq("id", "b2")]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.rows(Table::Bookings).len(), 1);
    }

    #[tokio::test]
    async fn injected_failures_are_logged_and_consumed() {
        let store = MockRecordStore::new();
        store.fail_next(StoreError::RequestFailed("offline".into()));

        assert!(store.select(&Query::from(Table::Users)).await.is_err());
        assert!(store.select(&Query::from(Table::Users)).await.is_ok());
        assert_eq!(
            store.calls(),
            vec![StoreCall::Select(Table::Users), StoreCall::Select(Table::Users)]
        );
    }
}

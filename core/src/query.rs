//! Store-agnostic query description.
//!
//! A [`Query`] names a table, a conjunction of column filters, an optional
//! ordering and the relations to expand. Store implementations translate it
//! into their own dialect (PostgREST query strings, in-memory scans).

use serde_json::Value;
use std::fmt;

/// Tables the marketplace reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// Adventure packages.
    Packages,
    /// Guest bookings.
    Bookings,
    /// Wishlist entries.
    Wishlist,
    /// Marketplace users.
    Users,
    /// Per-user payment subscription view.
    Subscriptions,
}

impl Table {
    /// Name of the table in the store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Bookings => "bookings",
            Self::Wishlist => "wishlist",
            Self::Users => "users",
            Self::Subscriptions => "stripe_user_subscriptions",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column predicate. All filters of a query must hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column == value`
    Eq(&'static str, Value),
    /// `column ∈ values`
    In(&'static str, Vec<Value>),
}

impl Filter {
    /// `column == value`
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Eq(column, value.into())
    }

    /// `column ∈ values`
    pub fn one_of<V: Into<Value>>(
        column: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(column, values.into_iter().map(Into::into).collect())
    }

    /// Evaluate the filter against a JSON row.
    ///
    /// Missing columns never match.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        match self {
            Self::Eq(column, expected) => row.get(column).is_some_and(|v| v == expected),
            Self::In(column, expected) => row
                .get(column)
                .is_some_and(|v| expected.iter().any(|e| e == v)),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Column to sort by.
    pub column: &'static str,
    /// Sort direction.
    pub direction: Direction,
}

/// A to-one relation expanded into the result rows.
///
/// `alias` is the key the related row lands under; it is looked up in
/// `table` by matching `table.id` against the row's `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Key of the embedded object.
    pub alias: &'static str,
    /// Related table.
    pub table: Table,
    /// Foreign-key column on the queried row.
    pub column: &'static str,
}

impl Relation {
    /// `package.host` → `users` via `host_id`.
    pub const PACKAGE_HOST: Self = Self {
        alias: "host",
        table: Table::Users,
        column: "host_id",
    };

    /// `booking.package` / `wishlist.package` → `packages` via `package_id`.
    pub const PACKAGE: Self = Self {
        alias: "package",
        table: Table::Packages,
        column: "package_id",
    };

    /// `booking.guest` → `users` via `guest_id`.
    pub const GUEST: Self = Self {
        alias: "guest",
        table: Table::Users,
        column: "guest_id",
    };
}

/// Select query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Table to read.
    pub table: Table,
    /// Conjunctive filters.
    pub filters: Vec<Filter>,
    /// Optional ordering.
    pub order: Option<Order>,
    /// Relations to expand.
    pub relations: Vec<Relation>,
    /// Optional row limit.
    pub limit: Option<usize>,
}

impl Query {
    /// Select every row of `table`.
    #[must_use]
    pub const fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            relations: Vec::new(),
            limit: None,
        }
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    /// Expand a relation.
    #[must_use]
    pub fn expand(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Newest rows first, by `created_at`.
    #[must_use]
    pub const fn newest_first(mut self) -> Self {
        self.order = Some(Order {
            column: "created_at",
            direction: Direction::Descending,
        });
        self
    }

    /// Cap the number of rows.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// `true` if every filter holds for `row`.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_are_conjunctive() {
        let row = json!({"guest_id": "g1", "package_id": "p1"});
        let query = Query::from(Table::Wishlist)
            .eq("guest_id", "g1")
            .eq("package_id", "p1");
        assert!(query.matches(&row));

        let query = query.eq("package_id", "p2");
        assert!(!query.matches(&row));
    }

    #[test]
    fn in_filter_matches_any_value() {
        let row = json!({"package_id": "p2"});
        assert!(Filter::one_of("package_id", ["p1", "p2"]).matches(&row));
        assert!(!Filter::one_of("package_id", Vec::<String>::new()).matches(&row));
        assert!(!Filter::eq("missing", "x").matches(&row));
    }
}

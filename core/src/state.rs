//! Marketplace domain types.
//!
//! Records mirror the rows of the hosted store. Relations that a query
//! expands (a package's host, a booking's package and guest) travel as
//! `Option` fields and decode to `None` when the store does not return them.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            #[doc = concat!("Generate a new random `", stringify!($name), "`.")]
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for serde_json::Value {
            fn from(id: $name) -> Self {
                Self::String(id.0.to_string())
            }
        }
    };
}

id_type!(
    /// Unique identifier for a user.
    UserId
);
id_type!(
    /// Unique identifier for an adventure package.
    PackageId
);
id_type!(
    /// Unique identifier for a booking.
    BookingId
);
id_type!(
    /// Unique identifier for a wishlist entry.
    WishlistId
);

// ═══════════════════════════════════════════════════════════════════════
// Money
// ═══════════════════════════════════════════════════════════════════════

/// Whole currency units.
///
/// Package prices are quoted per person per day; booking totals are the
/// product of price, head count and days, so all arithmetic is checked.
///
/// Decodes from a JSON integer or from a float with no fractional part,
/// since `numeric` columns may come back as `500.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole currency units.
    #[must_use]
    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    /// Amount in whole currency units.
    #[must_use]
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Multiply by a count, `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, factor: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(factor)).map(Self)
    }

    /// Add two amounts, clamping at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole amount of currency units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map(Money)
            .map_err(|_| E::custom(format!("amount {v} is out of range")))
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::float_cmp
    )]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() || v.fract() != 0.0 {
            return Err(E::custom(format!("amount {v} is not a whole number of units")));
        }
        if v < i64::MIN as f64 || v >= i64::MAX as f64 {
            return Err(E::custom(format!("amount {v} is out of range")));
        }
        Ok(Money(v as i64))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Principals
// ═══════════════════════════════════════════════════════════════════════

/// Marketplace role, assigned at account provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses, books and wishlists packages.
    Guest,
    /// Creates and manages packages.
    Host,
    /// Reviews packages, sees everything.
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Host => "host",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl From<Role> for serde_json::Value {
    fn from(value: Role) -> Self {
        Self::String(value.as_str().to_string())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor behind a dashboard call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// User ID.
    pub id: UserId,
    /// Role of the user.
    pub role: Role,
}

impl Principal {
    /// Create a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// `true` if the principal holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Opaque bearer credential for authenticated calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `true` for an empty token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════════════════

/// Marketplace user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Role.
    pub role: Role,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The principal this user acts as.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

/// Listing status of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    /// Being edited by its host.
    Draft,
    /// Submitted, awaiting review.
    Pending,
    /// Visible to guests.
    Approved,
    /// Turned down by a reviewer.
    Rejected,
}

impl PackageStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl From<PackageStatus> for serde_json::Value {
    fn from(value: PackageStatus) -> Self {
        Self::String(value.as_str().to_string())
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adventure package listed by a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package ID.
    pub id: PackageId,
    /// Owning host.
    pub host_id: UserId,
    /// Title.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Price per person per day.
    pub price: Money,
    /// Largest party that can book.
    pub max_people: u32,
    /// Nominal length in days.
    pub duration_days: u32,
    /// Where the adventure happens.
    #[serde(default)]
    pub location: String,
    /// Image URLs, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Listing status.
    pub status: PackageStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expanded host relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<User>,
}

/// Host-supplied fields for a new package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDraft {
    /// Title.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Price per person per day.
    pub price: Money,
    /// Largest party that can book.
    pub max_people: u32,
    /// Nominal length in days.
    pub duration_days: u32,
    /// Where the adventure happens.
    pub location: String,
    /// Image URLs, in display order.
    pub images: Vec<String>,
}

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting the host's decision.
    Pending,
    /// Accepted by the host.
    Confirmed,
    /// Declined by the host.
    Cancelled,
    /// Trip finished.
    Completed,
}

impl BookingStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl From<BookingStatus> for serde_json::Value {
    fn from(value: BookingStatus) -> Self {
        Self::String(value.as_str().to_string())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state, driven by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not paid yet.
    Pending,
    /// Settled.
    Paid,
    /// Payment attempt failed.
    Failed,
}

impl PaymentStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

/// A guest's reservation against a package.
///
/// `total_amount` is a snapshot taken at creation and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking ID.
    pub id: BookingId,
    /// Guest who booked.
    pub guest_id: UserId,
    /// Booked package.
    pub package_id: PackageId,
    /// Party size.
    pub people_count: u32,
    /// Days booked.
    pub duration_days: u32,
    /// Frozen total price.
    pub total_amount: Money,
    /// When the booking was placed.
    pub booking_date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expanded package relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
    /// Expanded guest relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<User>,
}

/// A guest's saved-for-later marker on a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Entry ID.
    pub id: WishlistId,
    /// Owning guest.
    pub guest_id: UserId,
    /// Saved package.
    pub package_id: PackageId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expanded package relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).ok(),
            Some("\"superadmin\"".to_string())
        );
        let role: Role = serde_json::from_str("\"host\"").unwrap_or(Role::Guest);
        assert_eq!(role, Role::Host);
    }

    #[test]
    fn money_multiplication_is_checked() {
        assert_eq!(Money::new(500).checked_mul(2), Some(Money::new(1000)));
        assert_eq!(Money::new(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn money_accepts_whole_floats_only() {
        let whole: Result<Money, _> = serde_json::from_value(serde_json::json!(500.0));
        assert_eq!(whole.ok(), Some(Money::new(500)));

        let fraction: Result<Money, _> = serde_json::from_value(serde_json::json!(499.5));
        let reason = fraction.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(reason.contains("not a whole number"), "{reason}");

        let text: Result<Money, _> = serde_json::from_value(serde_json::json!("500"));
        assert!(text.is_err());
    }

    #[test]
    fn package_row_with_numeric_price_decodes() {
        let raw = serde_json::json!({
            "id": "7f1c8f8e-4a43-4f5e-9d36-5c2f8f3c9a01",
            "host_id": "0d9b3f5a-0a8e-4c73-8b69-1b1d6f1e2c33",
            "name": "Trek",
            "price": 500.0,
            "max_people": 4,
            "duration_days": 3,
            "status": "approved",
            "created_at": "2025-01-01T00:00:00Z"
        });
        let package: Result<Package, _> = serde_json::from_value(raw);
        assert!(matches!(package, Ok(ref p) if p.price == Money::new(500)));
    }

    #[test]
    fn access_token_is_redacted_in_debug() {
        let token = AccessToken::new("secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.expose(), "secret");
    }

    #[test]
    fn missing_relations_decode_as_none() {
        let raw = serde_json::json!({
            "id": "7f1c8f8e-4a43-4f5e-9d36-5c2f8f3c9a01",
            "host_id": "0d9b3f5a-0a8e-4c73-8b69-1b1d6f1e2c33",
            "name": "Trek",
            "price": 500,
            "max_people": 4,
            "duration_days": 3,
            "status": "draft",
            "created_at": "2025-01-01T00:00:00Z",
            "host": null
        });
        let package: Result<Package, _> = serde_json::from_value(raw);
        assert!(matches!(package, Ok(ref p) if p.host.is_none() && p.images.is_empty()));
    }
}

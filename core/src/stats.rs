//! Derived dashboard statistics.
//!
//! Pure reductions over already-fetched collections. They are recomputed
//! from the current snapshot on every call; nothing is maintained
//! incrementally.

use crate::state::{
    Booking, BookingStatus, Money, Package, PackageStatus, PaymentStatus, Role, User,
};
use serde::{Deserialize, Serialize};

/// Package counts per status. Every status is present, zero when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStatusCounts {
    /// Drafts.
    pub draft: usize,
    /// Awaiting review.
    pub pending: usize,
    /// Listed.
    pub approved: usize,
    /// Turned down.
    pub rejected: usize,
}

impl PackageStatusCounts {
    /// Count `packages` by status.
    pub fn tally<'a>(packages: impl IntoIterator<Item = &'a Package>) -> Self {
        packages.into_iter().fold(Self::default(), |mut acc, p| {
            *acc.slot(p.status) += 1;
            acc
        })
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: PackageStatus) -> usize {
        match status {
            PackageStatus::Draft => self.draft,
            PackageStatus::Pending => self.pending,
            PackageStatus::Approved => self.approved,
            PackageStatus::Rejected => self.rejected,
        }
    }

    /// Sum over all statuses.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.draft + self.pending + self.approved + self.rejected
    }

    const fn slot(&mut self, status: PackageStatus) -> &mut usize {
        match status {
            PackageStatus::Draft => &mut self.draft,
            PackageStatus::Pending => &mut self.pending,
            PackageStatus::Approved => &mut self.approved,
            PackageStatus::Rejected => &mut self.rejected,
        }
    }
}

/// User counts per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    /// Guests.
    pub guests: usize,
    /// Hosts.
    pub hosts: usize,
    /// Superadmins.
    pub superadmins: usize,
}

impl RoleCounts {
    /// Count `users` by role.
    pub fn tally<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        users.into_iter().fold(Self::default(), |mut acc, u| {
            match u.role {
                Role::Guest => acc.guests += 1,
                Role::Host => acc.hosts += 1,
                Role::SuperAdmin => acc.superadmins += 1,
            }
            acc
        })
    }

    /// Sum over all roles.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.guests + self.hosts + self.superadmins
    }
}

/// Revenue and volume over a set of bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingTotals {
    /// Σ `total_amount` over paid bookings.
    pub total_revenue: Money,
    /// Number of bookings.
    pub total_bookings: usize,
    /// Number of confirmed bookings.
    pub confirmed_bookings: usize,
}

impl BookingTotals {
    /// Reduce `bookings`.
    pub fn tally<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        bookings.into_iter().fold(Self::default(), |mut acc, b| {
            if b.payment_status == PaymentStatus::Paid {
                acc.total_revenue = acc.total_revenue.saturating_add(b.total_amount);
            }
            if b.status == BookingStatus::Confirmed {
                acc.confirmed_bookings += 1;
            }
            acc.total_bookings += 1;
            acc
        })
    }
}

/// Host dashboard figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStats {
    /// Σ `total_amount` over the host's paid bookings.
    pub total_revenue: Money,
    /// Bookings across the host's packages.
    pub total_bookings: usize,
    /// Confirmed bookings across the host's packages.
    pub confirmed_bookings: usize,
    /// Number of packages the host owns.
    pub total_packages: usize,
    /// Host's packages by status.
    pub packages_by_status: PackageStatusCounts,
}

impl HostStats {
    /// Compute from the host's packages and the bookings against them.
    #[must_use]
    pub fn compute(packages: &[Package], bookings: &[Booking]) -> Self {
        let totals = BookingTotals::tally(bookings);
        Self {
            total_revenue: totals.total_revenue,
            total_bookings: totals.total_bookings,
            confirmed_bookings: totals.confirmed_bookings,
            total_packages: packages.len(),
            packages_by_status: PackageStatusCounts::tally(packages),
        }
    }
}

/// Platform-wide figures for the superadmin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    /// Σ `total_amount` over all paid bookings.
    pub total_revenue: Money,
    /// All bookings.
    pub total_bookings: usize,
    /// All confirmed bookings.
    pub confirmed_bookings: usize,
    /// Users by role.
    pub users_by_role: RoleCounts,
    /// Packages by status.
    pub packages_by_status: PackageStatusCounts,
}

impl PlatformStats {
    /// Compute from the full user, package and booking sets.
    #[must_use]
    pub fn compute(users: &[User], packages: &[Package], bookings: &[Booking]) -> Self {
        let totals = BookingTotals::tally(bookings);
        Self {
            total_revenue: totals.total_revenue,
            total_bookings: totals.total_bookings,
            confirmed_bookings: totals.confirmed_bookings,
            users_by_role: RoleCounts::tally(users),
            packages_by_status: PackageStatusCounts::tally(packages),
        }
    }

    /// Total registered users.
    #[must_use]
    pub const fn total_users(&self) -> usize {
        self.users_by_role.total()
    }

    /// Total packages across all statuses.
    #[must_use]
    pub const fn total_packages(&self) -> usize {
        self.packages_by_status.total()
    }

    /// Packages waiting for review.
    #[must_use]
    pub const fn pending_approvals(&self) -> usize {
        self.packages_by_status.pending
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::state::{BookingId, PackageId, UserId};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn package(status: PackageStatus) -> Package {
        Package {
            id: PackageId::new(),
            host_id: UserId::new(),
            name: "Trek".into(),
            description: String::new(),
            price: Money::new(500),
            max_people: 4,
            duration_days: 3,
            location: String::new(),
            images: vec![],
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            host: None,
        }
    }

    fn booking(amount: i64, status: BookingStatus, payment_status: PaymentStatus) -> Booking {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Booking {
            id: BookingId::new(),
            guest_id: UserId::new(),
            package_id: PackageId::new(),
            people_count: 1,
            duration_days: 1,
            total_amount: Money::new(amount),
            booking_date: at,
            status,
            payment_status,
            created_at: at,
            package: None,
            guest: None,
        }
    }

    #[test]
    fn histogram_defaults_missing_categories_to_zero() {
        let counts = PackageStatusCounts::tally(&[package(PackageStatus::Approved)]);
        assert_eq!(counts.draft, 0);
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 0);

        let empty = HostStats::compute(&[], &[]);
        assert_eq!(empty.packages_by_status, PackageStatusCounts::default());
        assert_eq!(empty.total_revenue, Money::ZERO);
    }

    #[test]
    fn revenue_counts_only_paid_bookings() {
        let bookings = vec![
            booking(3000, BookingStatus::Confirmed, PaymentStatus::Paid),
            booking(1200, BookingStatus::Pending, PaymentStatus::Pending),
            booking(800, BookingStatus::Cancelled, PaymentStatus::Failed),
            booking(450, BookingStatus::Completed, PaymentStatus::Paid),
        ];
        let stats = HostStats::compute(&[], &bookings);
        assert_eq!(stats.total_revenue, Money::new(3450));
        assert_eq!(stats.total_bookings, 4);
        assert_eq!(stats.confirmed_bookings, 1);
    }

    #[test]
    fn platform_stats_partition_users_by_role() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let user = |role| User {
            id: UserId::new(),
            email: "a@example.com".into(),
            full_name: String::new(),
            role,
            created_at: at,
        };
        let users = vec![
            user(Role::Guest),
            user(Role::Guest),
            user(Role::Host),
            user(Role::SuperAdmin),
        ];
        let packages = vec![package(PackageStatus::Pending), package(PackageStatus::Approved)];

        let stats = PlatformStats::compute(&users, &packages, &[]);
        assert_eq!(stats.users_by_role.guests, 2);
        assert_eq!(stats.users_by_role.hosts, 1);
        assert_eq!(stats.total_users(), 4);
        assert_eq!(stats.total_packages(), 2);
        assert_eq!(stats.pending_approvals(), 1);
    }

    fn arb_booking() -> impl Strategy<Value = Booking> {
        (
            0i64..100_000,
            prop_oneof![
                Just(BookingStatus::Pending),
                Just(BookingStatus::Confirmed),
                Just(BookingStatus::Cancelled),
                Just(BookingStatus::Completed),
            ],
            prop_oneof![
                Just(PaymentStatus::Pending),
                Just(PaymentStatus::Paid),
                Just(PaymentStatus::Failed),
            ],
        )
            .prop_map(|(amount, status, payment)| booking(amount, status, payment))
    }

    proptest! {
        #[test]
        fn revenue_equals_sum_of_paid(bookings in prop::collection::vec(arb_booking(), 0..40)) {
            let expected: i64 = bookings
                .iter()
                .filter(|b| b.payment_status == PaymentStatus::Paid)
                .map(|b| b.total_amount.units())
                .sum();
            let totals = BookingTotals::tally(&bookings);
            prop_assert_eq!(totals.total_revenue, Money::new(expected));
            prop_assert_eq!(totals.total_bookings, bookings.len());
        }

        #[test]
        fn totals_ignore_order(mut bookings in prop::collection::vec(arb_booking(), 0..40)) {
            let forward = BookingTotals::tally(&bookings);
            bookings.reverse();
            prop_assert_eq!(forward, BookingTotals::tally(&bookings));
        }
    }
}

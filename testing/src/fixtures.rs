//! Record fixtures.

use crate::epoch;
use basecamp_core::{
    Booking, BookingId, BookingStatus, Money, Package, PackageDraft, PackageId, PackageStatus,
    PaymentStatus, Role, User, UserId,
};

/// A user with the given role.
#[must_use]
pub fn user(role: Role) -> User {
    let id = UserId::new();
    User {
        id,
        email: format!("{role}-{}@example.com", &id.to_string()[..8]),
        full_name: format!("Test {role}"),
        role,
        created_at: epoch(),
    }
}

/// The "Trek" listing: 500 per person per day, up to 4 people, 3 days.
#[must_use]
pub fn trek_draft() -> PackageDraft {
    PackageDraft {
        name: "Trek".into(),
        description: "Three days along the ridge".into(),
        price: Money::new(500),
        max_people: 4,
        duration_days: 3,
        location: "Annapurna".into(),
        images: vec!["https://images.pexels.com/photos/1271619/pexels-photo-1271619.jpeg".into()],
    }
}

/// A "Trek" package owned by `host` in `status`.
#[must_use]
pub fn package(host: &User, status: PackageStatus) -> Package {
    let draft = trek_draft();
    Package {
        id: PackageId::new(),
        host_id: host.id,
        name: draft.name,
        description: draft.description,
        price: draft.price,
        max_people: draft.max_people,
        duration_days: draft.duration_days,
        location: draft.location,
        images: draft.images,
        status,
        created_at: epoch(),
        host: None,
    }
}

/// A booking of `package` by `guest` with the given statuses.
#[must_use]
pub fn booking(
    guest: &User,
    package: &Package,
    people_count: u32,
    status: BookingStatus,
    payment_status: PaymentStatus,
) -> Booking {
    let total_amount = package
        .price
        .checked_mul(people_count)
        .and_then(|m| m.checked_mul(package.duration_days))
        .unwrap_or(Money::ZERO);
    Booking {
        id: BookingId::new(),
        guest_id: guest.id,
        package_id: package.id,
        people_count,
        duration_days: package.duration_days,
        total_amount,
        booking_date: epoch(),
        status,
        payment_status,
        created_at: epoch(),
        package: None,
        guest: None,
    }
}

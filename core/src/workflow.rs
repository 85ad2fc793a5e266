//! Booking workflow engine.
//!
//! Legal state transitions for packages and bookings, and the constructors
//! that create them. Everything here is pure: callers fetch the records,
//! ask the workflow what the next state is, and persist it themselves.
//!
//! ```text
//! Package:  draft ──submit──▶ pending ──approve──▶ approved
//!                                    └──reject───▶ rejected
//!
//! Booking:  pending ──confirm──▶ confirmed
//!                   └──cancel───▶ cancelled        (completed: external)
//! ```
//!
//! Approved and rejected packages are terminal. Cancelling a booking does
//! not touch its payment status.

use crate::environment::Clock;
use crate::error::{MarketplaceError, Result};
use crate::state::{
    Booking, BookingId, BookingStatus, Package, PackageDraft, PackageId, PackageStatus,
    PaymentStatus, Principal, Role,
};

// ═══════════════════════════════════════════════════════════════════════
// Package lifecycle
// ═══════════════════════════════════════════════════════════════════════

/// Superadmin verdict on a pending package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// List the package for guests.
    Approve,
    /// Turn the package down.
    Reject,
}

impl ReviewDecision {
    /// Status the package ends up in.
    #[must_use]
    pub const fn target(self) -> PackageStatus {
        match self {
            Self::Approve => PackageStatus::Approved,
            Self::Reject => PackageStatus::Rejected,
        }
    }
}

impl TryFrom<PackageStatus> for ReviewDecision {
    type Error = MarketplaceError;

    fn try_from(status: PackageStatus) -> Result<Self> {
        match status {
            PackageStatus::Approved => Ok(Self::Approve),
            PackageStatus::Rejected => Ok(Self::Reject),
            other => Err(MarketplaceError::Validation(format!(
                "a review can only approve or reject, not set `{other}`"
            ))),
        }
    }
}

/// Host decision on a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingDecision {
    /// Accept the booking.
    Confirm,
    /// Decline the booking.
    Cancel,
}

impl BookingDecision {
    /// Status the booking ends up in.
    #[must_use]
    pub const fn target(self) -> BookingStatus {
        match self {
            Self::Confirm => BookingStatus::Confirmed,
            Self::Cancel => BookingStatus::Cancelled,
        }
    }
}

impl TryFrom<BookingStatus> for BookingDecision {
    type Error = MarketplaceError;

    fn try_from(status: BookingStatus) -> Result<Self> {
        match status {
            BookingStatus::Confirmed => Ok(Self::Confirm),
            BookingStatus::Cancelled => Ok(Self::Cancel),
            other => Err(MarketplaceError::Validation(format!(
                "a host can only confirm or cancel a booking, not set `{other}`"
            ))),
        }
    }
}

/// Build a new `draft` package owned by `actor`.
///
/// # Errors
///
/// - `Unauthorized` unless `actor` is a host
/// - `Validation` for an empty name, non-positive price, or zero
///   `max_people` / `duration_days`
pub fn new_package(actor: &Principal, draft: PackageDraft, clock: &dyn Clock) -> Result<Package> {
    if !actor.has_role(Role::Host) {
        return Err(MarketplaceError::unauthorized(
            "create package",
            format!("role `{}` cannot list packages", actor.role),
        ));
    }

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(MarketplaceError::Validation("package name is required".into()));
    }
    if draft.price.units() <= 0 {
        return Err(MarketplaceError::Validation(format!(
            "price must be positive, got {}",
            draft.price
        )));
    }
    if draft.max_people == 0 {
        return Err(MarketplaceError::Validation("max_people must be at least 1".into()));
    }
    if draft.duration_days == 0 {
        return Err(MarketplaceError::Validation("duration_days must be at least 1".into()));
    }

    Ok(Package {
        id: PackageId::new(),
        host_id: actor.id,
        name: name.to_string(),
        description: draft.description,
        price: draft.price,
        max_people: draft.max_people,
        duration_days: draft.duration_days,
        location: draft.location,
        images: draft.images,
        status: PackageStatus::Draft,
        created_at: clock.now(),
        host: None,
    })
}

/// Next status when `actor` submits `package` for approval.
///
/// # Errors
///
/// - `Unauthorized` unless `actor` is the host that owns the package
/// - `InvalidTransition` unless the package is a draft
pub fn submit_for_approval(actor: &Principal, package: &Package) -> Result<PackageStatus> {
    if !actor.has_role(Role::Host) || actor.id != package.host_id {
        return Err(MarketplaceError::unauthorized(
            "submit package",
            format!("package {} is not owned by {}", package.id, actor.id),
        ));
    }
    match package.status {
        PackageStatus::Draft => Ok(PackageStatus::Pending),
        from => Err(MarketplaceError::transition("package", from, PackageStatus::Pending)),
    }
}

/// Next status when `actor` reviews `package`.
///
/// # Errors
///
/// - `Unauthorized` unless `actor` is a superadmin
/// - `InvalidTransition` unless the package is pending
pub fn review_package(
    actor: &Principal,
    package: &Package,
    decision: ReviewDecision,
) -> Result<PackageStatus> {
    authorize_review(actor)?;
    match package.status {
        PackageStatus::Pending => Ok(decision.target()),
        from => Err(MarketplaceError::transition("package", from, decision.target())),
    }
}

/// Role gate for package reviews, usable before the package is loaded.
///
/// # Errors
///
/// `Unauthorized` unless `actor` is a superadmin.
pub fn authorize_review(actor: &Principal) -> Result<()> {
    if actor.has_role(Role::SuperAdmin) {
        Ok(())
    } else {
        Err(MarketplaceError::unauthorized(
            "review package",
            format!("role `{}` cannot change package status", actor.role),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Booking lifecycle
// ═══════════════════════════════════════════════════════════════════════

/// Build a new booking of `package` for `actor`.
///
/// The total is `price × people_count × duration_days`, frozen here.
///
/// # Errors
///
/// - `Unauthorized` unless `actor` is a guest
/// - `Validation` if the package is not approved, a count is zero,
///   `people_count` exceeds `max_people`, or the total overflows
pub fn new_booking(
    actor: &Principal,
    package: &Package,
    people_count: u32,
    duration_days: u32,
    clock: &dyn Clock,
) -> Result<Booking> {
    if !actor.has_role(Role::Guest) {
        return Err(MarketplaceError::unauthorized(
            "create booking",
            format!("role `{}` cannot book packages", actor.role),
        ));
    }
    if package.status != PackageStatus::Approved {
        return Err(MarketplaceError::Validation(format!(
            "package {} is not open for booking ({})",
            package.id, package.status
        )));
    }
    if people_count == 0 {
        return Err(MarketplaceError::Validation("people_count must be at least 1".into()));
    }
    if people_count > package.max_people {
        return Err(MarketplaceError::Validation(format!(
            "people_count {people_count} exceeds max_people {}",
            package.max_people
        )));
    }
    if duration_days == 0 {
        return Err(MarketplaceError::Validation("duration_days must be at least 1".into()));
    }

    let total_amount = package
        .price
        .checked_mul(people_count)
        .and_then(|amount| amount.checked_mul(duration_days))
        .ok_or_else(|| MarketplaceError::Validation("booking total overflows".into()))?;

    let now = clock.now();
    Ok(Booking {
        id: BookingId::new(),
        guest_id: actor.id,
        package_id: package.id,
        people_count,
        duration_days,
        total_amount,
        booking_date: now,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        created_at: now,
        package: None,
        guest: None,
    })
}

/// Next status when `actor` decides on `booking` of `package`.
///
/// # Errors
///
/// - `Validation` if `package` is not the booked package
/// - `Unauthorized` unless `actor` is the host that owns the package
/// - `InvalidTransition` unless the booking is pending
pub fn decide_booking(
    actor: &Principal,
    package: &Package,
    booking: &Booking,
    decision: BookingDecision,
) -> Result<BookingStatus> {
    if booking.package_id != package.id {
        return Err(MarketplaceError::Validation(format!(
            "booking {} is not for package {}",
            booking.id, package.id
        )));
    }
    if !actor.has_role(Role::Host) || actor.id != package.host_id {
        return Err(MarketplaceError::unauthorized(
            "update booking",
            format!("package {} is not owned by {}", package.id, actor.id),
        ));
    }
    match booking.status {
        BookingStatus::Pending => Ok(decision.target()),
        from => Err(MarketplaceError::transition("booking", from, decision.target())),
    }
}

//! Payment subscription status.
//!
//! The payment provider's webhook keeps one row per user in the
//! subscriptions view; the marketplace only reads it.

use crate::products::{self, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-side subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// No checkout completed yet.
    NotStarted,
    /// First payment outstanding.
    Incomplete,
    /// First payment never arrived.
    IncompleteExpired,
    /// In a free trial.
    Trialing,
    /// Paid up.
    Active,
    /// Renewal payment failed, retrying.
    PastDue,
    /// Ended.
    Canceled,
    /// Renewal retries exhausted.
    Unpaid,
    /// Billing paused.
    Paused,
    /// A state this build does not know about.
    #[serde(other)]
    Unknown,
}

/// The current user's subscription row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Provider state.
    pub subscription_status: SubscriptionState,
    /// Price the subscription bills.
    #[serde(default)]
    pub price_id: Option<String>,
    /// End of the current period, unix seconds.
    #[serde(default)]
    pub current_period_end: Option<i64>,
    /// Whether the subscription stops at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

impl Subscription {
    /// `true` when there is something to show: a row exists and checkout
    /// has at least started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.subscription_status != SubscriptionState::NotStarted
    }

    /// `true` while the subscription grants access.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(
            self.subscription_status,
            SubscriptionState::Active | SubscriptionState::Trialing
        )
    }

    /// End of the current period.
    #[must_use]
    pub fn period_end(&self) -> Option<DateTime<Utc>> {
        self.current_period_end
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Catalog product this subscription bills, if known.
    #[must_use]
    pub fn product(&self) -> Option<Product> {
        self.price_id.as_deref().and_then(products::find_by_price)
    }
}

//! Error types for marketplace operations.

use thiserror::Error;

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketplaceError>;

/// Failures reported by a [`RecordStore`](crate::providers::RecordStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response (network, timeout).
    #[error("Store request failed: {0}")]
    RequestFailed(String),

    /// The store answered with an error status.
    #[error("Store returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Body or message returned by the store
        message: String,
    },

    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A row could not be decoded into a domain record.
    #[error("Failed to decode {table} row: {reason}")]
    Decode {
        /// Table the row came from
        table: String,
        /// Decoder message
        reason: String,
    },

    /// The store itself is in a broken state.
    #[error("Store internal error: {0}")]
    Internal(String),
}

/// Error taxonomy for dashboard and workflow operations.
///
/// Authorization and validation failures are raised before any store call;
/// store failures are recoverable and leave the displayed state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketplaceError {
    // ═══════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════

    /// Actor lacks permission (wrong role or not the owner).
    #[error("Not allowed to {action}: {reason}")]
    Unauthorized {
        /// Operation that was refused
        action: &'static str,
        /// Why it was refused
        reason: String,
    },

    /// Requested state transition is not legal from the current state.
    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        /// Entity kind (`package`, `booking`)
        entity: &'static str,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Input constraint violated.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Referenced record does not exist or is not visible.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// No usable credential for an authenticated call.
    #[error("Authentication required")]
    Unauthenticated,

    // ═══════════════════════════════════════════════════════════
    // Collaborator Errors
    // ═══════════════════════════════════════════════════════════

    /// Record store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Checkout redirector failure.
    #[error("Checkout failed: {0}")]
    Checkout(String),
}

impl MarketplaceError {
    /// Returns `true` if this error is due to the caller's request.
    ///
    /// # Examples
    ///
    /// ```
    /// # use basecamp_core::MarketplaceError;
    /// assert!(MarketplaceError::Validation("people_count".into()).is_user_error());
    /// assert!(!MarketplaceError::Checkout("timeout".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::InvalidTransition { .. }
                | Self::Validation(_)
                | Self::NotFound { .. }
                | Self::Unauthenticated
        )
    }

    /// Returns `true` if retrying the same call later may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::RequestFailed(_) | StoreError::Status { .. })
                | Self::Checkout(_)
        )
    }

    /// Shorthand for [`MarketplaceError::Unauthorized`].
    #[must_use]
    pub fn unauthorized(action: &'static str, reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            action,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`MarketplaceError::InvalidTransition`].
    #[must_use]
    pub fn transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

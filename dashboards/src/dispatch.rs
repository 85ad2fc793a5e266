//! Role dispatch.

use crate::environment::DashboardEnvironment;
use crate::guest::GuestDashboard;
use crate::host::HostDashboard;
use crate::superadmin::SuperAdminDashboard;
use crate::view::LoadState;
use basecamp_core::providers::RecordStore;
use basecamp_core::{Principal, Result, Role};

/// The dashboard a signed-in principal lands on.
#[derive(Debug)]
pub enum Dashboard<S>
where
    S: RecordStore + Clone,
{
    /// Guest dashboard.
    Guest(GuestDashboard<S>),
    /// Host dashboard.
    Host(HostDashboard<S>),
    /// Superadmin dashboard.
    SuperAdmin(SuperAdminDashboard<S>),
}

impl<S> Dashboard<S>
where
    S: RecordStore + Clone,
{
    /// Pick the controller for `principal`'s role.
    #[must_use]
    pub fn for_principal(principal: &Principal, env: DashboardEnvironment<S>) -> Self {
        tracing::debug!(user = %principal.id, role = %principal.role, "selecting dashboard");
        match principal.role {
            Role::Guest => Self::Guest(GuestDashboard::new(env)),
            Role::Host => Self::Host(HostDashboard::new(env)),
            Role::SuperAdmin => Self::SuperAdmin(SuperAdminDashboard::new(env)),
        }
    }

    /// Role this dashboard serves.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Guest(_) => Role::Guest,
            Self::Host(_) => Role::Host,
            Self::SuperAdmin(_) => Role::SuperAdmin,
        }
    }

    /// Fetch progress of the underlying controller.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        match self {
            Self::Guest(d) => &d.view().load,
            Self::Host(d) => &d.view().load,
            Self::SuperAdmin(d) => &d.view().load,
        }
    }

    /// Load everything the dashboard shows.
    ///
    /// # Errors
    ///
    /// Whatever the controller's `refresh` returns.
    pub async fn refresh(&mut self, principal: &Principal) -> Result<()> {
        match self {
            Self::Guest(d) => d.refresh(principal).await,
            Self::Host(d) => d.refresh(principal).await,
            Self::SuperAdmin(d) => d.refresh(principal).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecamp_core::UserId;
    use basecamp_testing::MockRecordStore;

    #[test]
    fn each_role_gets_its_own_dashboard() {
        for role in [Role::Guest, Role::Host, Role::SuperAdmin] {
            let principal = Principal::new(UserId::new(), role);
            let env = DashboardEnvironment::with_system_clock(MockRecordStore::new());
            let dashboard = Dashboard::for_principal(&principal, env);
            assert_eq!(dashboard.role(), role);
            assert_eq!(dashboard.load_state(), &LoadState::Idle);
        }
    }
}

use octavian_db::models::{AdminProfile, Customer, Tenant};

use crate::identity::Principal;

use super::error::SessionError;

/// Everything a console consumer needs, published as one consistent value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub principal: Option<Principal>,
    pub admin_profile: Option<AdminProfile>,
    pub tenants: Vec<Tenant>,
    pub active_tenant_id: Option<String>,
    /// Customers who have interacted with the active tenant.
    pub scoped_collection: Vec<Customer>,
    /// True while the identity provider or any loader has not settled.
    pub loading: bool,
    /// First error by stage priority: identity, admin profile, tenant set, scoped collection.
    pub error: Option<SessionError>,
}

/// Tenant-scoped data, only handed out once the session is consistent.
#[derive(Debug, Clone, Copy)]
pub struct TenantView<'a> {
    pub tenant: &'a Tenant,
    pub customers: &'a [Customer],
}

impl SessionSnapshot {
    pub(crate) fn initial() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn tenant(&self, tenant_id: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.id == tenant_id)
    }

    pub fn active_tenant(&self) -> Option<&Tenant> {
        self.active_tenant_id
            .as_deref()
            .and_then(|id| self.tenant(id))
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    pub fn tenant_view(&self) -> Option<TenantView<'_>> {
        if !self.is_ready() {
            return None;
        }
        Some(TenantView {
            tenant: self.active_tenant()?,
            customers: &self.scoped_collection,
        })
    }
}

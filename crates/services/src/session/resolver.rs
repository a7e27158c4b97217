//! Active tenant selection.

use octavian_db::models::Tenant;
use tracing::debug;

use super::error::SessionError;

/// Picks the active tenant: the locally persisted choice if still a member,
/// else the first tenant. The admin's remote `last_selected_tenant` is a
/// cross-device hint only and never decides the outcome.
pub fn resolve(
    persisted_local: Option<&str>,
    persisted_remote: Option<&str>,
    candidates: &[Tenant],
) -> Option<String> {
    let chosen = persisted_local
        .filter(|id| candidates.iter().any(|t| t.id == *id))
        .or_else(|| candidates.first().map(|t| t.id.as_str()))?;

    if let Some(hint) = persisted_remote.filter(|hint| *hint != chosen) {
        debug!(remote_hint = hint, tenant_id = chosen, "Ignoring remote tenant hint");
    }
    Some(chosen.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveTenant {
    #[default]
    Unresolved,
    Resolved(String),
}

impl ActiveTenant {
    pub fn id(&self) -> Option<&str> {
        match self {
            ActiveTenant::Unresolved => None,
            ActiveTenant::Resolved(id) => Some(id),
        }
    }

    /// Resolves once the tenant set is non-empty, and again if the current
    /// choice is no longer a member. Returns the id when a new choice was made.
    pub fn reconcile(
        &mut self,
        persisted_local: Option<&str>,
        persisted_remote: Option<&str>,
        tenants: &[Tenant],
    ) -> Option<String> {
        if tenants.is_empty() {
            return None;
        }
        if let ActiveTenant::Resolved(current) = &*self {
            if tenants.iter().any(|t| t.id == *current) {
                return None;
            }
        }

        let chosen = resolve(persisted_local, persisted_remote, tenants)?;
        *self = ActiveTenant::Resolved(chosen.clone());
        Some(chosen)
    }

    /// Rejects targets outside the current tenant set without changing state.
    pub fn switch(&mut self, target: &str, tenants: &[Tenant]) -> Result<(), SessionError> {
        if !tenants.iter().any(|t| t.id == target) {
            return Err(SessionError::InvalidTenant(target.to_string()));
        }
        *self = ActiveTenant::Resolved(target.to_string());
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = ActiveTenant::Unresolved;
    }
}

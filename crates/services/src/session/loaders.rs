//! Stage fetches. Each loader captures its own failures into the outcome
//! instead of returning them, so a failing stage never tears down the session.

use futures::future::join_all;
use octavian_db::models::{AdminProfile, Customer, Tenant};
use tracing::{debug, warn};

use crate::dao::{AdminDao, CustomerDao, DaoError, TenantDao};

use super::error::{SessionError, Stage};
use super::stage::StageOutcome;

pub async fn load_admin_profile(
    admins: &AdminDao,
    principal_id: &str,
) -> StageOutcome<Option<AdminProfile>> {
    match admins.find(principal_id).await {
        Ok(Some(profile)) => StageOutcome::ok(Some(profile)),
        Ok(None) => {
            debug!(principal_id, "Admin profile not provisioned yet");
            StageOutcome::ok(None)
        }
        Err(e) => {
            warn!(principal_id, error = %e, "Failed to load admin profile");
            StageOutcome::failed(None, SessionError::transport(Stage::AdminProfile, e))
        }
    }
}

/// Fetches every tenant concurrently. Missing or unreadable tenants are
/// dropped; store failures are reported but do not discard the other results.
pub async fn load_tenants(tenants: &TenantDao, ids: &[String]) -> StageOutcome<Vec<Tenant>> {
    let results = join_all(ids.iter().map(|id| tenants.find(id))).await;

    let mut loaded = Vec::with_capacity(ids.len());
    let mut failures = Vec::new();
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(Some(tenant)) => loaded.push(tenant),
            Ok(None) => debug!(tenant_id = %id, "Tenant not found, dropping from set"),
            Err(DaoError::BsonDe(e)) => {
                warn!(tenant_id = %id, error = %e, "Unreadable tenant record, dropping from set");
            }
            Err(e) => {
                warn!(tenant_id = %id, error = %e, "Failed to load tenant");
                failures.push(format!("{id}: {e}"));
            }
        }
    }

    if failures.is_empty() {
        StageOutcome::ok(loaded)
    } else {
        StageOutcome::failed(
            loaded,
            SessionError::transport(Stage::TenantSet, failures.join("; ")),
        )
    }
}

pub async fn load_scoped_customers(
    customers: &CustomerDao,
    tenant_id: &str,
) -> StageOutcome<Vec<Customer>> {
    match customers.find_by_tenant_activity(tenant_id).await {
        Ok(found) => {
            debug!(tenant_id, count = found.len(), "Loaded tenant customers");
            StageOutcome::ok(found)
        }
        Err(e) => {
            warn!(tenant_id, error = %e, "Failed to load tenant customers");
            StageOutcome::failed(
                Vec::new(),
                SessionError::transport(Stage::ScopedCollection, e),
            )
        }
    }
}

use std::sync::Arc;

use bson::doc;
use octavian_db::DocumentStore;
use octavian_db::models::AdminProfile;

use super::base::{BaseDao, DaoResult};

pub struct AdminDao {
    pub base: BaseDao<AdminProfile>,
}

impl AdminDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, AdminProfile::COLLECTION),
        }
    }

    /// `None` means the admin is not provisioned yet.
    pub async fn find(&self, principal_id: &str) -> DaoResult<Option<AdminProfile>> {
        self.base.find_optional(principal_id).await
    }

    pub async fn create(&self, profile: &AdminProfile) -> DaoResult<()> {
        self.base.set(&profile.id, profile).await
    }

    pub async fn set_last_selected_tenant(
        &self,
        principal_id: &str,
        tenant_id: &str,
    ) -> DaoResult<()> {
        self.base
            .update_by_id(principal_id, doc! { "last_selected_tenant": tenant_id })
            .await
    }
}

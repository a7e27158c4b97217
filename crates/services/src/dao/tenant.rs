use std::sync::Arc;

use octavian_db::DocumentStore;
use octavian_db::models::Tenant;

use super::base::{BaseDao, DaoResult};

pub struct TenantDao {
    pub base: BaseDao<Tenant>,
}

impl TenantDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, Tenant::COLLECTION),
        }
    }

    pub async fn find(&self, tenant_id: &str) -> DaoResult<Option<Tenant>> {
        self.base.find_optional(tenant_id).await
    }

    pub async fn create(&self, tenant: &Tenant) -> DaoResult<()> {
        self.base.set(&tenant.id, tenant).await
    }
}

use std::sync::Arc;

use bson::Document;
use octavian_db::DocumentStore;
use octavian_db::models::{Platform, SocialAccount};

use super::base::{BaseDao, DaoResult};

pub struct SocialAccountDao {
    pub base: BaseDao<SocialAccount>,
}

impl SocialAccountDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, SocialAccount::COLLECTION),
        }
    }

    /// Last write wins; an existing record for the same platform is replaced.
    pub async fn upsert(&self, account: &SocialAccount) -> DaoResult<()> {
        self.base.set(&account.id, account).await
    }

    pub async fn find(
        &self,
        tenant_id: &str,
        platform: Platform,
    ) -> DaoResult<Option<SocialAccount>> {
        self.base
            .find_optional(&SocialAccount::key(tenant_id, platform))
            .await
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> DaoResult<Vec<SocialAccount>> {
        self.base.find_where("tenant_id", tenant_id).await
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        platform: Platform,
        partial: Document,
    ) -> DaoResult<()> {
        self.base
            .update_by_id(&SocialAccount::key(tenant_id, platform), partial)
            .await
    }

    pub async fn delete(&self, tenant_id: &str, platform: Platform) -> DaoResult<bool> {
        self.base
            .delete_by_id(&SocialAccount::key(tenant_id, platform))
            .await
    }
}

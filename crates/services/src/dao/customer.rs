use std::sync::Arc;

use octavian_db::DocumentStore;
use octavian_db::models::Customer;

use super::base::{BaseDao, DaoResult};

pub struct CustomerDao {
    pub base: BaseDao<Customer>,
}

impl CustomerDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, Customer::COLLECTION),
        }
    }

    /// Customers who have interacted with the given tenant.
    pub async fn find_by_tenant_activity(&self, tenant_id: &str) -> DaoResult<Vec<Customer>> {
        self.base
            .find_where(Customer::ACTIVITY_FIELD, tenant_id)
            .await
    }

    pub async fn create(&self, customer: &Customer) -> DaoResult<()> {
        self.base.set(&customer.id, customer).await
    }
}

use octavian_db::models::{AdminProfile, ContactInfo, Customer, Tenant};
use octavian_services::dao::{AdminDao, CustomerDao, TenantDao};

use super::test_app::TestApp;

impl TestApp {
    /// Stores an admin profile belonging to `tenant_ids`, in that order.
    pub async fn seed_admin(&self, principal_id: &str, tenant_ids: &[&str]) -> AdminProfile {
        let profile = AdminProfile {
            id: principal_id.to_string(),
            name: format!("Admin {principal_id}"),
            job_title: Some("Operator".to_string()),
            profile_picture: None,
            tenant_ids: tenant_ids.iter().map(|id| id.to_string()).collect(),
            last_selected_tenant: None,
        };
        AdminDao::new(self.dyn_store())
            .create(&profile)
            .await
            .expect("Failed to seed admin");
        profile
    }

    pub async fn seed_tenant(&self, tenant_id: &str) -> Tenant {
        let tenant = Tenant {
            id: tenant_id.to_string(),
            name: format!("Company {tenant_id}"),
            address: Some("1 Main St".to_string()),
            picture: None,
            contact_info: ContactInfo {
                phone: Some("+1 555 0100".to_string()),
                website: Some(format!("https://{tenant_id}.example.com")),
            },
        };
        TenantDao::new(self.dyn_store())
            .create(&tenant)
            .await
            .expect("Failed to seed tenant");
        tenant
    }

    pub async fn seed_tenants(&self, tenant_ids: &[&str]) -> Vec<Tenant> {
        let mut tenants = Vec::with_capacity(tenant_ids.len());
        for id in tenant_ids {
            tenants.push(self.seed_tenant(id).await);
        }
        tenants
    }

    /// Stores a customer who has interacted with `tenant_ids`.
    pub async fn seed_customer(&self, name: &str, tenant_ids: &[&str]) -> Customer {
        let customer = Customer {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: Some(format!("{}@customer.test", name.to_lowercase())),
            phone: None,
            past_activity: tenant_ids.iter().map(|id| id.to_string()).collect(),
        };
        CustomerDao::new(self.dyn_store())
            .create(&customer)
            .await
            .expect("Failed to seed customer");
        customer
    }
}

use serde::{Deserialize, Serialize};

/// Operator profile, keyed by the identity provider's principal id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub job_title: Option<String>,
    pub profile_picture: Option<String>,
    /// Tenants this admin belongs to, in display order.
    #[serde(default)]
    pub tenant_ids: Vec<String>,
    /// Cross-device hint for the last active tenant.
    pub last_selected_tenant: Option<String>,
}

impl AdminProfile {
    pub const COLLECTION: &'static str = "admins";
}

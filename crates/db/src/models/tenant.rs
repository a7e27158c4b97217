use serde::{Deserialize, Serialize};

/// A company the admin can act on behalf of. Read-only from the console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tenant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl Tenant {
    pub const COLLECTION: &'static str = "companies";
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Tenants this customer has interacted with.
    #[serde(default)]
    pub past_activity: Vec<String>,
}

impl Customer {
    pub const COLLECTION: &'static str = "customers";
    pub const ACTIVITY_FIELD: &'static str = "past_activity";
}

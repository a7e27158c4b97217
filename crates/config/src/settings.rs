use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub credentials: CredentialSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Local storage key holding the last active tenant id.
    pub selected_tenant_key: String,
    /// JSON file backing local storage. In-memory when unset.
    pub local_storage_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CredentialSettings {
    pub secret_length: usize,
    pub validity_days: i64,
    pub expiring_soon_days: i64,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            secret_length: 16,
            validity_days: 30,
            expiring_soon_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file (silently ignore if missing)
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("OCTAVIAN"),
            )
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "octavian")?
            .set_default("session.selected_tenant_key", "selectedCompanyId")?
            .set_default("session.local_storage_path", None::<String>)?
            .set_default("credentials.secret_length", 16)?
            .set_default("credentials.validity_days", 30)?
            .set_default("credentials.expiring_soon_days", 7)?
            .set_default(
                "log.filter",
                "octavian_services=debug,octavian_db=debug,info",
            )?
            .set_default("log.json", false)?
            .build()?;

        config.try_deserialize()
    }
}

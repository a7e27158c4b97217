use std::sync::Arc;

use octavian_config::Settings;
use octavian_db::indexes::ensure_indexes;
use octavian_db::{DocumentStore, MemoryStore, MongoStore};
use thiserror::Error;
use tokio::sync::watch;

use crate::credentials::CredentialManager;
use crate::identity::IdentityState;
use crate::local_storage::{self, LocalStorage, LocalStorageError};
use crate::session::{Session, SessionAggregator};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("Local storage error: {0}")]
    LocalStorage(#[from] LocalStorageError),
}

/// Everything one console process shares between sessions.
#[derive(Clone)]
pub struct ConsoleState {
    pub settings: Settings,
    pub store: Arc<dyn DocumentStore>,
    pub local_storage: Arc<dyn LocalStorage>,
    pub credentials: Arc<CredentialManager>,
}

impl ConsoleState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        settings: Settings,
    ) -> Result<Self, BootstrapError> {
        let local_storage = local_storage::from_settings(&settings.session)?;
        let credentials = Arc::new(CredentialManager::new(
            Arc::clone(&store),
            &settings.credentials,
        ));

        Ok(Self {
            settings,
            store,
            local_storage,
            credentials,
        })
    }

    /// Connects to MongoDB and makes sure the indexes exist.
    pub async fn connect(settings: Settings) -> Result<Self, BootstrapError> {
        let db = octavian_db::connect(&settings).await?;
        ensure_indexes(&db).await?;
        Self::new(Arc::new(MongoStore::new(db)), settings)
    }

    /// Process-local store, nothing survives a restart.
    pub fn offline(settings: Settings) -> Result<Self, BootstrapError> {
        Self::new(Arc::new(MemoryStore::new()), settings)
    }

    pub fn spawn_session(&self, identity: watch::Receiver<IdentityState>) -> Session {
        SessionAggregator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.local_storage),
            &self.settings.session,
        )
        .spawn(identity)
    }
}

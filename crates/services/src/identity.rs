use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// Authenticated principal as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    /// The provider has not reported yet.
    #[default]
    Pending,
    SignedOut,
    SignedIn(Principal),
    /// The provider could not be reached.
    Failed(String),
}

impl IdentityState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, IdentityState::Pending)
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            IdentityState::SignedIn(principal) => Some(principal),
            _ => None,
        }
    }
}

/// Publishes sign-in and sign-out events to session pipelines.
pub struct IdentityWatcher {
    tx: watch::Sender<IdentityState>,
}

impl Default for IdentityWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityWatcher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(IdentityState::Pending);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.tx.subscribe()
    }

    pub fn sign_in(&self, principal: Principal) {
        info!(principal_id = %principal.id, "Principal signed in");
        self.publish(IdentityState::SignedIn(principal));
    }

    pub fn sign_out(&self) {
        info!("Principal signed out");
        self.publish(IdentityState::SignedOut);
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.publish(IdentityState::Failed(message.into()));
    }

    fn publish(&self, state: IdentityState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }
}

use std::sync::Arc;

use octavian_config::SessionSettings;
use octavian_db::DocumentStore;
use octavian_db::models::{AdminProfile, Customer, Tenant};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::dao::{AdminDao, CustomerDao, TenantDao};
use crate::identity::IdentityState;
use crate::local_storage::LocalStorage;

use super::error::{SessionError, Stage};
use super::loaders;
use super::resolver::ActiveTenant;
use super::snapshot::SessionSnapshot;
use super::stage::{StageOutcome, StageSlot};

const COMMAND_BUFFER: usize = 16;

enum Command {
    SwitchTenant {
        tenant_id: String,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Refresh {
        reply: oneshot::Sender<()>,
    },
}

/// Last-selected tenant to record on the admin profile.
struct RemoteHint {
    principal_id: String,
    tenant_id: String,
}

enum Completion {
    AdminProfile {
        generation: u64,
        outcome: StageOutcome<Option<AdminProfile>>,
    },
    Tenants {
        generation: u64,
        outcome: StageOutcome<Vec<Tenant>>,
    },
    ScopedCollection {
        generation: u64,
        outcome: StageOutcome<Vec<Customer>>,
    },
}

/// Builds and starts the session pipeline for one console.
pub struct SessionAggregator {
    admins: Arc<AdminDao>,
    tenants: Arc<TenantDao>,
    customers: Arc<CustomerDao>,
    local_storage: Arc<dyn LocalStorage>,
    selected_tenant_key: String,
}

impl SessionAggregator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        local_storage: Arc<dyn LocalStorage>,
        settings: &SessionSettings,
    ) -> Self {
        Self {
            admins: Arc::new(AdminDao::new(Arc::clone(&store))),
            tenants: Arc::new(TenantDao::new(Arc::clone(&store))),
            customers: Arc::new(CustomerDao::new(store)),
            local_storage,
            selected_tenant_key: settings.selected_tenant_key.clone(),
        }
    }

    /// Spawns the pipeline driver on the current tokio runtime. The driver
    /// stops once every [`Session`] handle has been dropped.
    pub fn spawn(self, identity: watch::Receiver<IdentityState>) -> Session {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::initial());
        let (hint_tx, hint_rx) = mpsc::unbounded_channel();
        tokio::spawn(write_remote_hints(Arc::clone(&self.admins), hint_rx));

        let pipeline = Pipeline {
            admins: self.admins,
            tenant_dao: self.tenants,
            customer_dao: self.customers,
            local_storage: self.local_storage,
            selected_tenant_key: self.selected_tenant_key,
            identity: IdentityState::Pending,
            session_principal: None,
            admin: StageSlot::new(),
            tenants: StageSlot::new(),
            active: ActiveTenant::Unresolved,
            scoped: StageSlot::new(),
            completions: completion_tx,
            remote_hints: hint_tx,
            snapshot: snapshot_tx,
        };
        tokio::spawn(pipeline.run(identity, command_rx, completion_rx));

        Session {
            commands: command_tx,
            snapshot: snapshot_rx,
        }
    }
}

/// Consumer handle onto a running session pipeline.
#[derive(Clone)]
pub struct Session {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<SessionSnapshot>,
}

impl Session {
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Waits for the first published snapshot matching `ready`.
    pub async fn wait_until(
        &self,
        ready: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut rx = self.snapshot.clone();
        let snapshot = rx.wait_for(ready).await.map_err(|_| SessionError::Closed)?;
        Ok((*snapshot).clone())
    }

    /// Waits until nothing is loading.
    pub async fn settled(&self) -> Result<SessionSnapshot, SessionError> {
        self.wait_until(|s| !s.loading).await
    }

    /// Makes `tenant_id` the active tenant. Fails with `InvalidTenant`, and
    /// changes nothing, when it is not in the current tenant set.
    pub async fn switch_tenant(&self, tenant_id: &str) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::SwitchTenant {
                tenant_id: tenant_id.to_string(),
                reply,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Fetches every stage with a present input again, starting from the admin
    /// profile. This is how callers retry after a transport error or pick up
    /// membership changes. Returns once the refetch has been started.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Refresh { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

struct Pipeline {
    admins: Arc<AdminDao>,
    tenant_dao: Arc<TenantDao>,
    customer_dao: Arc<CustomerDao>,
    local_storage: Arc<dyn LocalStorage>,
    selected_tenant_key: String,
    identity: IdentityState,
    session_principal: Option<String>,
    admin: StageSlot<String, Option<AdminProfile>>,
    tenants: StageSlot<Vec<String>, Vec<Tenant>>,
    active: ActiveTenant,
    scoped: StageSlot<String, Vec<Customer>>,
    completions: mpsc::UnboundedSender<Completion>,
    remote_hints: mpsc::UnboundedSender<RemoteHint>,
    snapshot: watch::Sender<SessionSnapshot>,
}

impl Pipeline {
    async fn run(
        mut self,
        mut identity: watch::Receiver<IdentityState>,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        self.identity = identity.borrow_and_update().clone();
        self.propagate();

        let mut identity_open = true;
        loop {
            tokio::select! {
                changed = identity.changed(), if identity_open => match changed {
                    Ok(()) => {
                        self.identity = identity.borrow_and_update().clone();
                        self.propagate();
                    }
                    Err(_) => {
                        debug!("Identity provider closed");
                        identity_open = false;
                    }
                },
                Some(completion) = completions.recv() => {
                    self.apply(completion);
                    self.propagate();
                }
                command = commands.recv() => match command {
                    Some(Command::SwitchTenant { tenant_id, reply }) => {
                        let result = self.switch_tenant(tenant_id);
                        let _ = reply.send(result);
                    }
                    Some(Command::Refresh { reply }) => {
                        self.refresh();
                        let _ = reply.send(());
                    }
                    None => break,
                },
            }
        }
        debug!("Session driver stopped");
    }

    /// Walks the stages in dependency order, starting fetches whose inputs
    /// changed, then publishes one snapshot.
    fn propagate(&mut self) {
        let principal_id = self.identity.principal().map(|p| p.id.clone());
        if principal_id != self.session_principal {
            debug!(principal_id = ?principal_id, "Principal changed, starting new session");
            self.session_principal = principal_id.clone();
            self.active.reset();
        }

        if let Some((generation, principal_id)) = self.admin.retarget(principal_id) {
            self.spawn_admin_fetch(generation, principal_id);
        }

        let tenant_ids = self
            .admin
            .value
            .as_ref()
            .map(|profile| profile.tenant_ids.clone())
            .filter(|ids| !ids.is_empty());
        if let Some((generation, ids)) = self.tenants.retarget(tenant_ids) {
            self.spawn_tenants_fetch(generation, ids);
        }

        let remote = self
            .admin
            .value
            .as_ref()
            .and_then(|profile| profile.last_selected_tenant.clone());
        let local = self.local_storage.get(&self.selected_tenant_key);
        if let Some(chosen) =
            self.active
                .reconcile(local.as_deref(), remote.as_deref(), &self.tenants.value)
        {
            info!(tenant_id = %chosen, "Active tenant resolved");
            self.persist_selection(&chosen);
        }

        let active = self.active.id().map(str::to_owned);
        if let Some((generation, tenant_id)) = self.scoped.retarget(active) {
            self.spawn_scoped_fetch(generation, tenant_id);
        }

        self.publish();
    }

    fn apply(&mut self, completion: Completion) {
        let (stage, generation, accepted) = match completion {
            Completion::AdminProfile {
                generation,
                outcome,
            } => (
                Stage::AdminProfile,
                generation,
                self.admin.complete(generation, outcome),
            ),
            Completion::Tenants {
                generation,
                outcome,
            } => (
                Stage::TenantSet,
                generation,
                self.tenants.complete(generation, outcome),
            ),
            Completion::ScopedCollection {
                generation,
                outcome,
            } => (
                Stage::ScopedCollection,
                generation,
                self.scoped.complete(generation, outcome),
            ),
        };

        if !accepted {
            debug!(%stage, generation, "Discarding stale completion");
        }
    }

    fn refresh(&mut self) {
        info!(principal_id = ?self.session_principal, "Refreshing session");
        if let Some((generation, principal_id)) = self.admin.reload() {
            self.spawn_admin_fetch(generation, principal_id);
        }
        if let Some((generation, ids)) = self.tenants.reload() {
            self.spawn_tenants_fetch(generation, ids);
        }
        if let Some((generation, tenant_id)) = self.scoped.reload() {
            self.spawn_scoped_fetch(generation, tenant_id);
        }
        self.propagate();
    }

    fn switch_tenant(&mut self, tenant_id: String) -> Result<(), SessionError> {
        if let Err(e) = self.active.switch(&tenant_id, &self.tenants.value) {
            warn!(tenant_id = %tenant_id, "Rejected switch to unknown tenant");
            return Err(e);
        }

        info!(tenant_id = %tenant_id, "Switched active tenant");
        self.persist_selection(&tenant_id);
        if let Some(principal_id) = self.session_principal.clone() {
            let _ = self.remote_hints.send(RemoteHint {
                principal_id,
                tenant_id,
            });
        }
        self.propagate();
        Ok(())
    }

    fn persist_selection(&self, tenant_id: &str) {
        if let Err(e) = self.local_storage.set(&self.selected_tenant_key, tenant_id) {
            warn!(tenant_id, error = %e, "Failed to persist selected tenant locally");
        }
    }

    fn publish(&self) {
        let identity_error = match &self.identity {
            IdentityState::Failed(message) => Some(SessionError::Transport {
                stage: Stage::Identity,
                message: message.clone(),
            }),
            _ => None,
        };
        let error = identity_error
            .or_else(|| self.admin.error.clone())
            .or_else(|| self.tenants.error.clone())
            .or_else(|| self.scoped.error.clone());

        let loading = !self.identity.is_settled()
            || self.admin.loading
            || self.tenants.loading
            || self.scoped.loading;

        let next = SessionSnapshot {
            principal: self.identity.principal().cloned(),
            admin_profile: self.admin.value.clone(),
            tenants: self.tenants.value.clone(),
            active_tenant_id: self.active.id().map(str::to_owned),
            scoped_collection: self.scoped.value.clone(),
            loading,
            error,
        };

        self.snapshot.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn spawn_admin_fetch(&self, generation: u64, principal_id: String) {
        debug!(generation, principal_id = %principal_id, "Fetching admin profile");
        let admins = Arc::clone(&self.admins);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = loaders::load_admin_profile(&admins, &principal_id).await;
            let _ = tx.send(Completion::AdminProfile {
                generation,
                outcome,
            });
        });
    }

    fn spawn_tenants_fetch(&self, generation: u64, ids: Vec<String>) {
        debug!(generation, count = ids.len(), "Fetching tenant set");
        let tenants = Arc::clone(&self.tenant_dao);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = loaders::load_tenants(&tenants, &ids).await;
            let _ = tx.send(Completion::Tenants {
                generation,
                outcome,
            });
        });
    }

    fn spawn_scoped_fetch(&self, generation: u64, tenant_id: String) {
        debug!(generation, tenant_id = %tenant_id, "Fetching tenant customers");
        let customers = Arc::clone(&self.customer_dao);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = loaders::load_scoped_customers(&customers, &tenant_id).await;
            let _ = tx.send(Completion::ScopedCollection {
                generation,
                outcome,
            });
        });
    }
}

/// Writes remote hints one at a time, in switch order, so the profile ends up
/// with the latest selection. Failures never roll back the local switch.
async fn write_remote_hints(
    admins: Arc<AdminDao>,
    mut hints: mpsc::UnboundedReceiver<RemoteHint>,
) {
    while let Some(RemoteHint {
        principal_id,
        tenant_id,
    }) = hints.recv().await
    {
        if let Err(e) = admins
            .set_last_selected_tenant(&principal_id, &tenant_id)
            .await
        {
            warn!(
                principal_id = %principal_id,
                tenant_id = %tenant_id,
                error = %e,
                "Failed to record last selected tenant"
            );
        }
    }
}

use std::fmt;

use thiserror::Error;

/// Pipeline stage that produced an error, in aggregate priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Identity,
    AdminProfile,
    TenantSet,
    ScopedCollection,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Identity => "identity",
            Stage::AdminProfile => "admin profile",
            Stage::TenantSet => "tenant set",
            Stage::ScopedCollection => "scoped collection",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Transport failure while loading {stage}: {message}")]
    Transport { stage: Stage, message: String },
    #[error("Tenant {0} is not one of the admin's tenants")]
    InvalidTenant(String),
    #[error("Session driver has shut down")]
    Closed,
}

impl SessionError {
    pub fn transport(stage: Stage, err: impl fmt::Display) -> Self {
        SessionError::Transport {
            stage,
            message: err.to_string(),
        }
    }
}

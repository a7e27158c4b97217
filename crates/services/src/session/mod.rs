//! Session bootstrap: identity, admin profile, tenant set, active tenant and
//! tenant-scoped data, folded into one published [`SessionSnapshot`].
//!
//! Stages run as a small dependency pipeline. A stage re-runs only when its
//! input changes by value, and every fetch is tagged with the generation of
//! the input that triggered it so late completions for old inputs are dropped.

mod aggregator;
pub mod error;
pub mod loaders;
pub mod resolver;
mod snapshot;
pub mod stage;

pub use aggregator::{Session, SessionAggregator};
pub use error::{SessionError, Stage};
pub use resolver::{ActiveTenant, resolve};
pub use snapshot::{SessionSnapshot, TenantView};
pub use stage::StageOutcome;

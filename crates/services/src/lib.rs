pub mod credentials;
pub mod dao;
pub mod identity;
pub mod local_storage;
pub mod logging;
pub mod session;
pub mod state;

pub use credentials::{Clipboard, CredentialError, CredentialManager, RotatedSecret};
pub use dao::*;
pub use identity::{IdentityState, IdentityWatcher, Principal};
pub use local_storage::{FileLocalStorage, LocalStorage, MemoryLocalStorage};
pub use logging::init_tracing;
pub use session::{Session, SessionAggregator, SessionError, SessionSnapshot};
pub use state::{BootstrapError, ConsoleState};

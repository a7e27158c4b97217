//! Per-tenant linked accounts and their locally generated secrets.

pub mod clipboard;
pub mod expiry;
mod manager;
pub mod secret;

pub use clipboard::{Clipboard, ClipboardError};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use expiry::{
    AccountView, CredentialRecord, ExpiryPolicy, ExpiryStatus, SecretAction, SecretClass,
    is_expired,
};
pub use manager::{CredentialError, CredentialManager};
pub use secret::{RotatedSecret, SECRET_ALPHABET, digest_secret, generate_secret};

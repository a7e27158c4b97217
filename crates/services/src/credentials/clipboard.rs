use thiserror::Error;

#[derive(Debug, Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Write-only destination for freshly rotated secrets.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(feature = "system-clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "system-clipboard")]
mod system {
    use parking_lot::Mutex;

    use super::{Clipboard, ClipboardError};

    /// OS clipboard via `arboard`.
    pub struct SystemClipboard {
        inner: Mutex<arboard::Clipboard>,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self, ClipboardError> {
            let inner = arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
            Ok(Self {
                inner: Mutex::new(inner),
            })
        }
    }

    impl Clipboard for SystemClipboard {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.inner
                .lock()
                .set_text(text.to_string())
                .map_err(|e| ClipboardError(e.to_string()))
        }
    }
}

use octavian_services::credentials::{Clipboard, ClipboardError};
use parking_lot::Mutex;

/// Records every write. Can be switched to refuse writes.
#[derive(Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
    broken: Mutex<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        let clipboard = Self::default();
        *clipboard.broken.lock() = true;
        clipboard
    }

    pub fn last(&self) -> Option<String> {
        self.writes.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if *self.broken.lock() {
            return Err(ClipboardError("no display".into()));
        }
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

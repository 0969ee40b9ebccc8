#![forbid(unsafe_code)]

use crate::service::{ClipboardError, ClipboardSink};

/// The OS clipboard, via arboard.
pub struct SystemClipboard {
    backend: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let backend =
            arboard::Clipboard::new().map_err(|err| ClipboardError::new(err.to_string()))?;
        Ok(Self { backend })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.backend
            .set_text(text)
            .map_err(|err| ClipboardError::new(err.to_string()))
    }
}

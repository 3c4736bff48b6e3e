//! System clipboard access

use std::fmt;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write to clipboard: {0}")]
    Write(String),
}

/// Destination for copied text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard of the desktop session, via arboard
///
/// The handle is opened on first copy and kept for the life of the sink.
/// On X11 and Wayland the copied text is served from that handle, so it
/// stays available until the sink is dropped or a clipboard manager takes
/// it over.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a copy has opened the session clipboard
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                debug!("SystemClipboard::handle: opening session clipboard");
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?
            }
        };
        Ok(self.handle.insert(handle))
    }
}

impl fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClipboard").field("open", &self.is_open()).finish()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        debug!(len = text.len(), "SystemClipboard::set_text: called");
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

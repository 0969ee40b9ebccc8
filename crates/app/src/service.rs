#![forbid(unsafe_code)]

use seq_core::sequence::SequenceValue;
use seq_core::stamp::{self, StampTime};
use seq_storage::{CounterStore, StoreError};

/// Clipboard access is an external collaborator; the service only sees this
/// seam, so it runs (and tests) without a desktop session.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug)]
pub struct ClipboardError {
    message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "clipboard: {}", self.message)
    }
}

impl std::error::Error for ClipboardError {}

#[derive(Debug)]
pub struct Triggered {
    /// The sequence value this trigger consumed (the stamp's suffix).
    pub sequence: SequenceValue,
    pub stamp: String,
    /// Clipboard writes are best-effort and never retried; a failure is
    /// reported here instead of undoing the increment.
    pub clipboard_error: Option<ClipboardError>,
}

pub struct StampService<C: ClipboardSink> {
    store: CounterStore,
    clipboard: C,
}

impl<C: ClipboardSink> StampService<C> {
    pub fn new(store: CounterStore, clipboard: C) -> Self {
        Self { store, clipboard }
    }

    /// The next sequence value to be handed out. Read-only; this is what a
    /// display surface renders.
    pub fn current(&self) -> SequenceValue {
        self.store.current()
    }

    /// One trigger: stamp the value at the head of the sequence, advance the
    /// persisted counter past it, copy the stamp to the clipboard.
    ///
    /// A storage failure aborts the whole trigger — nothing reaches the
    /// clipboard and both the persisted and in-memory values stay at their
    /// pre-trigger state.
    pub fn on_trigger(&mut self, now: StampTime) -> Result<Triggered, StoreError> {
        let sequence = self.store.current();
        self.store.increment()?;

        let stamp = stamp::render(&now, sequence);
        let clipboard_error = self.clipboard.set_text(&stamp).err();
        Ok(Triggered {
            sequence,
            stamp,
            clipboard_error,
        })
    }
}

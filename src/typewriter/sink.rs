//! Text sinks receiving the typewriter's visible text.

use std::sync::{Arc, Mutex};

/// Destination for the rendered typewriter text.
///
/// Every write is a full replacement. Writing the same text twice must be
/// harmless.
pub trait TextSink {
    /// Whether the underlying element still exists.
    ///
    /// The host owns the element's lifetime; the cycler checks this
    /// before each render and skips the write when it returns `false`.
    fn is_attached(&self) -> bool {
        true
    }

    /// Replaces the displayed text.
    fn replace_text(&mut self, text: &str);
}

/// An absent sink is a detached sink.
impl<S: TextSink> TextSink for Option<S> {
    fn is_attached(&self) -> bool {
        self.as_ref().is_some_and(TextSink::is_attached)
    }

    fn replace_text(&mut self, text: &str) {
        if let Some(sink) = self {
            sink.replace_text(text);
        }
    }
}

impl<S: TextSink + ?Sized> TextSink for Box<S> {
    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn replace_text(&mut self, text: &str) {
        (**self).replace_text(text);
    }
}

/// Sink that records every write.
///
/// Clones share the same record, so a driver can own one handle while a
/// test or the CLI inspects another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    writes: Vec<String>,
    detached: bool,
}

impl RecordingSink {
    /// Creates an attached, empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the host removing the element.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn detach(&self) {
        self.inner.lock().expect("sink lock poisoned").detached = true;
    }

    /// All writes received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.inner.lock().expect("sink lock poisoned").writes.clone()
    }

    /// Number of writes received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.lock().expect("sink lock poisoned").writes.len()
    }

    /// The currently displayed text, if anything was written.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("sink lock poisoned")
            .writes
            .last()
            .cloned()
    }
}

impl TextSink for RecordingSink {
    fn is_attached(&self) -> bool {
        !self.inner.lock().expect("sink lock poisoned").detached
    }

    fn replace_text(&mut self, text: &str) {
        self.inner
            .lock()
            .expect("sink lock poisoned")
            .writes
            .push(text.to_string());
    }
}

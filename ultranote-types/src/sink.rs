//! Consumers of generated text.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::GenerateError;

/// Receives the output of one generation at a time.
///
/// The orchestrator calls [`reset`](Sink::reset) before the first increment
/// of a new stream, then [`append`](Sink::append) once per increment in
/// arrival order, then exactly one of [`completed`](Sink::completed) or
/// [`failed`](Sink::failed). A cancelled generation ends with a second
/// `reset` instead.
pub trait Sink: Send + Sync {
    /// Discard any accumulated output.
    fn reset(&self);

    /// Append one text increment.
    fn append(&self, increment: &str);

    /// The stream finished normally.
    fn completed(&self) {}

    /// The generation failed. Called once per failed submission.
    fn failed(&self, _error: &GenerateError) {}
}

/// Lifecycle of the output held by an [`OutputAccumulator`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputStatus {
    /// Nothing has been requested yet, or the last generation was cancelled.
    #[default]
    Idle,
    /// Increments are arriving.
    Streaming,
    /// The last generation finished normally.
    Completed,
    /// The last generation failed with the given message.
    Failed(String),
}

#[derive(Debug, Default)]
struct Inner {
    text: String,
    status: OutputStatus,
}

/// Append-only text buffer implementing [`Sink`].
///
/// Reads return snapshots, so a renderer can poll [`text`](Self::text) while
/// a generation is streaming.
#[derive(Debug, Default)]
pub struct OutputAccumulator {
    inner: Mutex<Inner>,
}

impl OutputAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the accumulated text.
    #[must_use]
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Snapshot of the current status.
    #[must_use]
    pub fn status(&self) -> OutputStatus {
        self.lock().status.clone()
    }

    /// Length of the accumulated text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().text.len()
    }

    /// Whether no text has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().text.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for OutputAccumulator {
    fn reset(&self) {
        let mut inner = self.lock();
        inner.text = String::new();
        inner.status = OutputStatus::Idle;
    }

    fn append(&self, increment: &str) {
        let mut inner = self.lock();
        inner.text.push_str(increment);
        inner.status = OutputStatus::Streaming;
    }

    fn completed(&self) {
        self.lock().status = OutputStatus::Completed;
    }

    fn failed(&self, error: &GenerateError) {
        self.lock().status = OutputStatus::Failed(error.to_string());
    }
}

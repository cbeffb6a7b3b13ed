//! Sink that renders increments to a terminal as they arrive.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use ultranote_types::{GenerateError, OutputAccumulator, Sink};

/// Writes each increment straight to `out` and keeps a copy of the text.
///
/// Text written to a terminal cannot be taken back. When a generation is
/// cancelled, [`reset`](Sink::reset) clears the kept copy and ends the
/// partial line so the cancellation notice on stderr starts on its own line;
/// the partial text itself stays on screen.
pub struct TerminalSink<W> {
    out: Mutex<W>,
    text: OutputAccumulator,
}

impl<W: Write + Send> TerminalSink<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            text: OutputAccumulator::new(),
        }
    }

    /// Everything rendered for the current generation.
    pub fn text(&self) -> String {
        self.text.text()
    }

    #[cfg(test)]
    fn status(&self) -> ultranote_types::OutputStatus {
        self.text.status()
    }

    fn write(&self, s: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = out.write_all(s.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write output");
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for TerminalSink<W> {
    fn reset(&self) {
        let discarded = self.text.text();
        self.text.reset();
        if !discarded.is_empty() && !discarded.ends_with('\n') {
            self.write("\n");
        }
    }

    fn append(&self, increment: &str) {
        self.text.append(increment);
        self.write(increment);
    }

    fn completed(&self) {
        self.text.completed();
        if !self.text.is_empty() && !self.text.text().ends_with('\n') {
            self.write("\n");
        }
    }

    fn failed(&self, error: &GenerateError) {
        self.text.failed(error);
        if !self.text.is_empty() {
            self.write("\n");
        }
    }
}

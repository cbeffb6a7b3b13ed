//! Streams of text increments.

use std::pin::Pin;

use futures::Stream;

use crate::error::StreamError;

/// One item of a decoded generation stream.
///
/// `Ok` carries a non-empty text increment. An `Err` is always the last item.
pub type Increment = Result<String, StreamError>;

/// Handle to a live generation stream.
pub struct IncrementStream {
    /// The increments. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Increment> + Send>>,
}

impl IncrementStream {
    /// Box an increment stream into a handle.
    pub fn new(stream: impl Stream<Item = Increment> + Send + 'static) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }
}

impl std::fmt::Debug for IncrementStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementStream").finish_non_exhaustive()
    }
}

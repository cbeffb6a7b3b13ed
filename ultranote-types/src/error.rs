//! Error types for ultranote.

use std::time::Duration;

/// Message surfaced when the Stream Source rejects a request without a
/// structured error body.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate notes";

/// Terminal failure raised while reading a response body.
///
/// Decoder-level problems (malformed frames, missing content) never produce
/// this; only the transport does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The underlying byte stream reported an error.
    #[error("stream read error: {0}")]
    Transport(String),
}

impl StreamError {
    /// Build a transport error from anything displayable.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Errors from a single generation request.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Connecting to the Stream Source timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// The Stream Source or its upstream is rate limiting requests.
    #[error("{0}")]
    RateLimited(String),
    /// Credentials were missing or rejected.
    #[error("{0}")]
    Authentication(String),
    /// The Stream Source failed with a server-side status.
    #[error("{message}")]
    ServiceUnavailable {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the generic failure message.
        message: String,
    },
    /// Any other non-2xx response.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the generic failure message.
        message: String,
    },
    /// The response body failed while it was being read.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// The generation task ended abnormally.
    #[error("generation task failed: {0}")]
    Task(String),
}

impl GenerateError {
    /// Whether submitting the same request again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Timeout(_)
                | Self::RateLimited(_)
                | Self::ServiceUnavailable { .. }
                | Self::Stream(_)
        )
    }

    /// HTTP status of the rejected response, if the failure came from one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited(_) => Some(429),
            Self::ServiceUnavailable { status, .. } | Self::Rejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Reasons a submission is refused before any stream is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The prompt is empty after trimming.
    #[error("prompt is empty")]
    EmptyPrompt,
    /// Another generation is still streaming.
    #[error("a generation is already in progress")]
    Busy,
}

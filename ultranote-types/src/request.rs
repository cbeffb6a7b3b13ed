//! Request and response bodies exchanged with the Stream Source.

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::mode::Mode;

/// Body of a generation request sent to the Stream Source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// User prompt. Never empty after trimming.
    pub prompt: String,
    /// Generation mode, passed through to the Stream Source.
    pub mode: Mode,
}

impl GenerationRequest {
    /// Build a request, rejecting prompts that are empty after trimming.
    ///
    /// The prompt is sent as given; only the emptiness check trims.
    pub fn new(prompt: impl Into<String>, mode: Mode) -> Result<Self, SubmitError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }
        Ok(Self { prompt, mode })
    }
}

/// Structured error body returned by the Stream Source with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_prompt() {
        assert_eq!(
            GenerationRequest::new("  \n\t ", Mode::Normal),
            Err(SubmitError::EmptyPrompt)
        );
    }

    #[test]
    fn keeps_prompt_untrimmed() {
        let req = GenerationRequest::new("  photosynthesis ", Mode::Mcqs).unwrap();
        assert_eq!(req.prompt, "  photosynthesis ");
    }

    #[test]
    fn serializes_to_wire_shape() {
        let req = GenerationRequest::new("cells", Mode::Important).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "prompt": "cells", "mode": "important" }));
    }

    #[test]
    fn error_body_parses() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Rate limit exceeded. Please try again later."}"#)
                .unwrap();
        assert!(body.error.starts_with("Rate limit"));
    }
}

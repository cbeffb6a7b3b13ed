//! Internal error helpers for mapping HTTP/reqwest errors to [`GenerateError`].

use std::time::Duration;

use ultranote_types::{ErrorBody, GENERIC_FAILURE_MESSAGE, GenerateError};

/// Map a non-2xx status from the Stream Source to a [`GenerateError`].
///
/// The message is the `error` field of a `{ "error": string }` body when one
/// is present, otherwise [`GENERIC_FAILURE_MESSAGE`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> GenerateError {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => GenerateError::Authentication(message),
        429 => GenerateError::RateLimited(message),
        code @ 500..=599 => GenerateError::ServiceUnavailable {
            status: code,
            message,
        },
        code => GenerateError::Rejected {
            status: code,
            message,
        },
    }
}

/// Extract the message of a structured error body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

/// Map a [`reqwest::Error`] to a [`GenerateError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Option<Duration>) -> GenerateError {
    match timeout {
        Some(limit) if err.is_timeout() => GenerateError::Timeout(limit),
        _ => GenerateError::Network(Box::new(err)),
    }
}
